//! # 错误处理宏

/// 按错误种类快速构造 `LedgerError`
///
/// ```ignore
/// let err = error!(Validation, "page_size 必须大于 0, got {}", size);
/// ```
#[macro_export]
macro_rules! error {
    (Config, $($arg:tt)+) => {
        $crate::error::LedgerError::config(format!($($arg)+))
    };
    (Database, $($arg:tt)+) => {
        $crate::error::LedgerError::database(format!($($arg)+))
    };
    (Validation, $($arg:tt)+) => {
        $crate::error::LedgerError::validation(format!($($arg)+))
    };
    (Auth, $($arg:tt)+) => {
        $crate::error::LedgerError::auth(format!($($arg)+))
    };
    (Permission, $($arg:tt)+) => {
        $crate::error::LedgerError::permission(format!($($arg)+))
    };
    (Internal, $($arg:tt)+) => {
        $crate::error::LedgerError::internal(format!($($arg)+))
    };
}

/// 立即返回错误
#[macro_export]
macro_rules! bail {
    ($kind:ident, $($arg:tt)+) => {
        return Err($crate::error!($kind, $($arg)+).into())
    };
}

/// 条件不满足时返回错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $kind:ident, $($arg:tt)+) => {
        if !($cond) {
            $crate::bail!($kind, $($arg)+);
        }
    };
}

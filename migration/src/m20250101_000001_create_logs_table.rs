use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Logs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Logs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Logs::UserId).integer().not_null().default(0))
                    // Unix 秒
                    .col(ColumnDef::new(Logs::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Logs::LogType).integer().not_null().default(0))
                    .col(ColumnDef::new(Logs::Content).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Logs::Username)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Logs::TokenName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Logs::ModelName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    // === 计量 ===
                    .col(ColumnDef::new(Logs::Quota).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Logs::PromptTokens)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Logs::CompletionTokens)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Logs::UseTime).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Logs::IsStream)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // === 路由信息 ===
                    .col(ColumnDef::new(Logs::ChannelId).integer().not_null().default(0))
                    .col(ColumnDef::new(Logs::TokenId).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Logs::Group)
                            .string_len(64)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Logs::RequestKey)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Logs::Other).text().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        // 列表与统计都按时间倒序扫描
        manager
            .create_index(
                Index::create()
                    .name("idx_logs_created_at")
                    .table(Logs::Table)
                    .col(Logs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logs_user_created_at")
                    .table(Logs::Table)
                    .col(Logs::UserId)
                    .col(Logs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logs_model_name")
                    .table(Logs::Table)
                    .col(Logs::ModelName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logs_username")
                    .table(Logs::Table)
                    .col(Logs::Username)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logs_token_name")
                    .table(Logs::Table)
                    .col(Logs::TokenName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logs_request_key")
                    .table(Logs::Table)
                    .col(Logs::RequestKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Logs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Logs {
    Table,
    Id,
    UserId,
    CreatedAt,
    #[sea_orm(iden = "type")]
    LogType,
    Content,
    Username,
    TokenName,
    ModelName,
    Quota,
    PromptTokens,
    CompletionTokens,
    UseTime,
    IsStream,
    ChannelId,
    TokenId,
    Group,
    RequestKey,
    Other,
}

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

/// Settings (前端展示配置，单行)
#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    Title,
    Description,
    ButtonText,
    BackgroundImage,
    BackgroundMusic,
    SearchButton,
    InnerBackground,
    SpinButton,
    Theme,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settings::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Settings::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Settings::Description).text().null())
                    .col(
                        ColumnDef::new(Settings::ButtonText)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Settings::BackgroundImage).text().null())
                    .col(ColumnDef::new(Settings::BackgroundMusic).text().null())
                    .col(ColumnDef::new(Settings::SearchButton).text().null())
                    .col(ColumnDef::new(Settings::InnerBackground).text().null())
                    .col(ColumnDef::new(Settings::SpinButton).text().null())
                    .col(
                        ColumnDef::new(Settings::Theme)
                            .string_len(32)
                            .not_null()
                            .default("default"),
                    )
                    .col(
                        ColumnDef::new(Settings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 初始化默认配置 (id 固定为 1)
        let conn = manager.get_connection();
        let insert_sql = r#"
INSERT INTO settings (id, title, button_text, theme)
VALUES (1, 'Lucky Prize Draw', 'SPIN', 'default')
ON CONFLICT (id) DO NOTHING;
"#;
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            insert_sql.to_string(),
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Settings::Table).to_owned())
            .await?;
        Ok(())
    }
}

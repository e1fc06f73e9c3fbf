use sea_orm_migration::prelude::*;

/// Prizes (奖品配置表)
#[derive(DeriveIden)]
enum Prizes {
    Table,
    Id,
    Name,
    Description,
    Image,
    Probability,
    Position,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// probability 为相对权重，不要求所有启用奖品之和为 100
/// position 取值 1-12，仅供前端九宫格/球体布局使用
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Prizes::Description).text().null())
                    .col(ColumnDef::new(Prizes::Image).text().null())
                    .col(
                        ColumnDef::new(Prizes::Probability)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Prizes::Position)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Prizes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 启用奖品按位置读取
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prizes_active_position")
                    .table(Prizes::Table)
                    .col(Prizes::IsActive)
                    .col(Prizes::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;
        Ok(())
    }
}

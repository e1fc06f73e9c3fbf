use sea_orm_migration::prelude::*;

/// Prize Codes (兑奖码，一次性使用)
#[derive(DeriveIden)]
enum PrizeCodes {
    Table,
    Id,
    Code,
    PrizeId,
    IsUsed,
    UsedAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PrizeCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrizeCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrizeCodes::Code).string_len(10).not_null())
                    // 不加外键: 删除奖品时既不级联删除兑奖码，也不被兑奖码阻塞
                    .col(ColumnDef::new(PrizeCodes::PrizeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(PrizeCodes::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PrizeCodes::UsedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PrizeCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 兑奖码唯一，冲突由生成端重试
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prize_codes_code_unique")
                    .table(PrizeCodes::Table)
                    .col(PrizeCodes::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prize_codes_prize")
                    .table(PrizeCodes::Table)
                    .col(PrizeCodes::PrizeId)
                    .to_owned(),
            )
            .await?;

        // 统计查询 (is_used = true, 按 used_at 分日)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prize_codes_used")
                    .table(PrizeCodes::Table)
                    .col(PrizeCodes::IsUsed)
                    .col(PrizeCodes::UsedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PrizeCodes::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 等级绩点表 ====================
        manager
            .create_table(
                Table::create()
                    .table(GradingScale::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradingScale::Grade)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradingScale::Gpa).double().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 插入固定等级表 ====================
        let default_scale = [
            ("A", 4.00),
            ("B+", 3.50),
            ("B", 3.00),
            ("C+", 2.50),
            ("C", 2.00),
            ("D+", 1.50),
            ("D", 1.00),
            ("F", 0.00),
        ];

        for (grade, gpa) in default_scale {
            let insert = Query::insert()
                .into_table(GradingScale::Table)
                .columns([GradingScale::Grade, GradingScale::Gpa])
                .values_panic([grade.into(), gpa.into()])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GradingScale::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum GradingScale {
    #[sea_orm(iden = "grading_scale")]
    Table,
    Grade,
    Gpa,
}

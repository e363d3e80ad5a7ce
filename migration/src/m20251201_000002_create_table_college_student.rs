use sea_orm_migration::prelude::*;

use crate::m20251201_000001_create_table_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(College::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(College::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(College::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(College::Name).string().not_null())
                    .col(ColumnDef::new(College::Description).text().null())
                    .col(ColumnDef::new(College::Address).string().null())
                    .col(ColumnDef::new(College::RazorpayAccountId).string().null())
                    .col(ColumnDef::new(College::BankAccountNumber).string().null())
                    .col(ColumnDef::new(College::BankIfscCode).string().null())
                    .col(
                        ColumnDef::new(College::BankAccountHolderName)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(College::ContactEmail).string().null())
                    .col(
                        ColumnDef::new(College::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_college_user")
                            .from_tbl(College::Table)
                            .from_col(College::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Student::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Student::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Student::CollegeId).uuid().not_null())
                    .col(ColumnDef::new(Student::Name).string().not_null())
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_user")
                            .from_tbl(Student::Table)
                            .from_col(Student::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_college")
                            .from_tbl(Student::Table)
                            .from_col(Student::CollegeId)
                            .to_tbl(College::Table)
                            .to_col(College::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_college_id")
                    .table(Student::Table)
                    .col(Student::CollegeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_student_college_id")
                    .table(Student::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(College::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum College {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Address,
    RazorpayAccountId,
    BankAccountNumber,
    BankIfscCode,
    BankAccountHolderName,
    ContactEmail,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Student {
    Table,
    Id,
    UserId,
    CollegeId,
    Name,
    CreatedAt,
}

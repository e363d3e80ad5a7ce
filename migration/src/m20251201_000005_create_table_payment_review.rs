use sea_orm_migration::prelude::*;

use crate::m20251201_000002_create_table_college_student::{College, Student};
use crate::m20251201_000003_create_table_fest_event::Event;
use crate::m20251201_000004_create_table_registration::EventRegistration;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payment::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payment::RegistrationId).uuid().not_null())
                    .col(ColumnDef::new(Payment::CollegeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Payment::GatewayOrderId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Payment::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Payment::Amount).integer().not_null())
                    .col(ColumnDef::new(Payment::Currency).string_len(8).not_null())
                    .col(ColumnDef::new(Payment::GatewayPaymentId).string().null())
                    .col(ColumnDef::new(Payment::ReceiptEmail).string().null())
                    .col(ColumnDef::new(Payment::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Payment::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_registration")
                            .from_tbl(Payment::Table)
                            .from_col(Payment::RegistrationId)
                            .to_tbl(EventRegistration::Table)
                            .to_col(EventRegistration::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_college")
                            .from_tbl(Payment::Table)
                            .from_col(Payment::CollegeId)
                            .to_tbl(College::Table)
                            .to_col(College::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventReview::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventReview::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventReview::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventReview::StudentId).uuid().not_null())
                    .col(ColumnDef::new(EventReview::Rating).integer().not_null())
                    .col(ColumnDef::new(EventReview::ReviewText).text().null())
                    .col(ColumnDef::new(EventReview::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_review_event")
                            .from_tbl(EventReview::Table)
                            .from_col(EventReview::EventId)
                            .to_tbl(Event::Table)
                            .to_col(Event::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_review_student")
                            .from_tbl(EventReview::Table)
                            .from_col(EventReview::StudentId)
                            .to_tbl(Student::Table)
                            .to_col(Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_registration_id")
                    .table(Payment::Table)
                    .col(Payment::RegistrationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_event_review_event_student")
                    .table(EventReview::Table)
                    .col(EventReview::EventId)
                    .col(EventReview::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_event_review_event_student")
                    .table(EventReview::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_payment_registration_id")
                    .table(Payment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EventReview::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    RegistrationId,
    CollegeId,
    GatewayOrderId,
    Status,
    Amount,
    Currency,
    GatewayPaymentId,
    ReceiptEmail,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EventReview {
    Table,
    Id,
    EventId,
    StudentId,
    Rating,
    ReviewText,
    CreatedAt,
}

use sea_orm_migration::prelude::*;

use crate::m20251201_000002_create_table_college_student::Student;
use crate::m20251201_000003_create_table_fest_event::Event;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Team::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Team::EventId).uuid().not_null())
                    .col(ColumnDef::new(Team::Name).string().not_null())
                    .col(ColumnDef::new(Team::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(Team::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_event")
                            .from_tbl(Team::Table)
                            .from_col(Team::EventId)
                            .to_tbl(Event::Table)
                            .to_col(Event::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_creator")
                            .from_tbl(Team::Table)
                            .from_col(Team::CreatorId)
                            .to_tbl(Student::Table)
                            .to_col(Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TeamMembers::TeamId).uuid().not_null())
                    .col(ColumnDef::new(TeamMembers::StudentId).uuid().not_null())
                    .col(ColumnDef::new(TeamMembers::JoinedAt).timestamp().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_team_members")
                            .col(TeamMembers::TeamId)
                            .col(TeamMembers::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_team")
                            .from_tbl(TeamMembers::Table)
                            .from_col(TeamMembers::TeamId)
                            .to_tbl(Team::Table)
                            .to_col(Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_student")
                            .from_tbl(TeamMembers::Table)
                            .from_col(TeamMembers::StudentId)
                            .to_tbl(Student::Table)
                            .to_col(Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventRegistration::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventRegistration::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventRegistration::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventRegistration::StudentId).uuid().not_null())
                    .col(ColumnDef::new(EventRegistration::TeamId).uuid().null())
                    .col(
                        ColumnDef::new(EventRegistration::RegisteredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventRegistration::Status)
                            .string_len(32)
                            .not_null()
                            .default("registered"),
                    )
                    // pending | paid | failed
                    .col(
                        ColumnDef::new(EventRegistration::PaymentStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(EventRegistration::CertificateApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(EventRegistration::ReceiptNumber)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_registration_event")
                            .from_tbl(EventRegistration::Table)
                            .from_col(EventRegistration::EventId)
                            .to_tbl(Event::Table)
                            .to_col(Event::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_registration_student")
                            .from_tbl(EventRegistration::Table)
                            .from_col(EventRegistration::StudentId)
                            .to_tbl(Student::Table)
                            .to_col(Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_registration_team")
                            .from_tbl(EventRegistration::Table)
                            .from_col(EventRegistration::TeamId)
                            .to_tbl(Team::Table)
                            .to_col(Team::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One registration per (event, student)
        manager
            .create_index(
                Index::create()
                    .name("uq_event_registration_event_student")
                    .table(EventRegistration::Table)
                    .col(EventRegistration::EventId)
                    .col(EventRegistration::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_registration_student_id")
                    .table(EventRegistration::Table)
                    .col(EventRegistration::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_event_id")
                    .table(Team::Table)
                    .col(Team::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_team_event_id")
                    .table(Team::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_event_registration_student_id")
                    .table(EventRegistration::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_event_registration_event_student")
                    .table(EventRegistration::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EventRegistration::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
    EventId,
    Name,
    CreatorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamMembers {
    Table,
    TeamId,
    StudentId,
    JoinedAt,
}

#[derive(DeriveIden)]
pub(crate) enum EventRegistration {
    Table,
    Id,
    EventId,
    StudentId,
    TeamId,
    RegisteredAt,
    Status,
    PaymentStatus,
    CertificateApproved,
    ReceiptNumber,
}

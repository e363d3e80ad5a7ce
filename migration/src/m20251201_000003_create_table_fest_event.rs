use sea_orm_migration::prelude::*;

use crate::m20251201_000002_create_table_college_student::College;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fest::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Fest::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Fest::CollegeId).uuid().not_null())
                    .col(ColumnDef::new(Fest::Name).string().not_null())
                    .col(ColumnDef::new(Fest::Description).text().null())
                    .col(ColumnDef::new(Fest::StartDate).date().not_null())
                    .col(ColumnDef::new(Fest::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Fest::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Fest::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Fest::ImageUrl).string().null())
                    .col(ColumnDef::new(Fest::ThumbnailUrl).string().null())
                    .col(ColumnDef::new(Fest::City).string().null())
                    .col(ColumnDef::new(Fest::State).string().null())
                    .col(ColumnDef::new(Fest::Country).string().null())
                    .col(ColumnDef::new(Fest::Mode).string().null())
                    .col(ColumnDef::new(Fest::Website).string().null())
                    .col(ColumnDef::new(Fest::ContactPhone).string().null())
                    .col(ColumnDef::new(Fest::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Fest::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fest_college")
                            .from_tbl(Fest::Table)
                            .from_col(Fest::CollegeId)
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
                    .table(Event::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Event::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Event::CollegeId).uuid().not_null())
                    .col(ColumnDef::new(Event::FestId).uuid().null())
                    .col(ColumnDef::new(Event::Name).string().not_null())
                    .col(ColumnDef::new(Event::Description).text().not_null())
                    .col(ColumnDef::new(Event::EventDate).date().not_null())
                    .col(ColumnDef::new(Event::Location).string().not_null())
                    .col(ColumnDef::new(Event::Fees).integer().not_null().default(0))
                    .col(ColumnDef::new(Event::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Event::RegisteredCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Event::TeamIsAllowed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Event::Category).string().null())
                    .col(ColumnDef::new(Event::Mode).string().null())
                    .col(ColumnDef::new(Event::PosterUrl).string().null())
                    .col(ColumnDef::new(Event::PosterThumbnailUrl).string().null())
                    .col(
                        ColumnDef::new(Event::PosterApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Event::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Event::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Event::CashPrize).string().null())
                    .col(ColumnDef::new(Event::FirstPrize).string().null())
                    .col(ColumnDef::new(Event::SecondPrize).string().null())
                    .col(ColumnDef::new(Event::ThirdPrize).string().null())
                    .col(ColumnDef::new(Event::City).string().null())
                    .col(ColumnDef::new(Event::State).string().null())
                    .col(ColumnDef::new(Event::Country).string().null())
                    .col(ColumnDef::new(Event::EventWebsite).string().null())
                    .col(ColumnDef::new(Event::ContactPhone).string().null())
                    .col(ColumnDef::new(Event::OrganizerName).string().null())
                    .col(ColumnDef::new(Event::OrganizerEmail).string().null())
                    .col(ColumnDef::new(Event::OrganizerPhone).string().null())
                    .col(ColumnDef::new(Event::Rules).text().null())
                    .col(ColumnDef::new(Event::Requirements).text().null())
                    .col(ColumnDef::new(Event::RegistrationDeadline).date().not_null())
                    .col(
                        ColumnDef::new(Event::RegistrationOpen)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Event::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Event::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_college")
                            .from_tbl(Event::Table)
                            .from_col(Event::CollegeId)
                            .to_tbl(College::Table)
                            .to_col(College::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_fest")
                            .from_tbl(Event::Table)
                            .from_col(Event::FestId)
                            .to_tbl(Fest::Table)
                            .to_col(Fest::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fest_college_id")
                    .table(Fest::Table)
                    .col(Fest::CollegeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_college_id")
                    .table(Event::Table)
                    .col(Event::CollegeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_fest_id")
                    .table(Event::Table)
                    .col(Event::FestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_event_date")
                    .table(Event::Table)
                    .col(Event::EventDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_event_event_date")
                    .table(Event::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_event_fest_id")
                    .table(Event::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_event_college_id")
                    .table(Event::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_fest_college_id")
                    .table(Fest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Fest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Fest {
    Table,
    Id,
    CollegeId,
    Name,
    Description,
    StartDate,
    EndDate,
    Approved,
    Active,
    ImageUrl,
    ThumbnailUrl,
    City,
    State,
    Country,
    Mode,
    Website,
    ContactPhone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Event {
    Table,
    Id,
    CollegeId,
    FestId,
    Name,
    Description,
    EventDate,
    Location,
    Fees,
    Capacity,
    RegisteredCount,
    TeamIsAllowed,
    Category,
    Mode,
    PosterUrl,
    PosterThumbnailUrl,
    PosterApproved,
    Approved,
    Active,
    CashPrize,
    FirstPrize,
    SecondPrize,
    ThirdPrize,
    City,
    State,
    Country,
    EventWebsite,
    ContactPhone,
    OrganizerName,
    OrganizerEmail,
    OrganizerPhone,
    Rules,
    Requirements,
    RegistrationDeadline,
    RegistrationOpen,
    CreatedAt,
    UpdatedAt,
}

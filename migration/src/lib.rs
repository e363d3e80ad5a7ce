pub use sea_orm_migration::prelude::*;

mod m20251201_000001_create_table_users;
mod m20251201_000002_create_table_college_student;
mod m20251201_000003_create_table_fest_event;
mod m20251201_000004_create_table_registration;
mod m20251201_000005_create_table_payment_review;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251201_000001_create_table_users::Migration),
            Box::new(m20251201_000002_create_table_college_student::Migration),
            Box::new(m20251201_000003_create_table_fest_event::Migration),
            Box::new(m20251201_000004_create_table_registration::Migration),
            Box::new(m20251201_000005_create_table_payment_review::Migration),
        ]
    }
}

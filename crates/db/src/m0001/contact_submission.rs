use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::ContactSubmission;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(ContactSubmission::Table)
        .col(
            ColumnDef::new(ContactSubmission::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(ContactSubmission::Name)
                .string()
                .not_null()
                .string_len(150),
        )
        .col(
            ColumnDef::new(ContactSubmission::Email)
                .string()
                .not_null()
                .string_len(320),
        )
        .col(
            ColumnDef::new(ContactSubmission::Subject)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(ColumnDef::new(ContactSubmission::Message).text().not_null())
        .col(
            ColumnDef::new(ContactSubmission::SubmittedAt)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(ContactSubmission::Responded)
                .boolean()
                .not_null()
                .default(false),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(ContactSubmission::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_contact_submission_submitted_at")
        .table(ContactSubmission::Table)
        .col(ContactSubmission::SubmittedAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_contact_submission_submitted_at")
        .table(ContactSubmission::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

use async_trait::async_trait;

use crate::Submission;

/// Append-only storage for submissions.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a submission and return its assigned id.
    async fn insert(&self, submission: &Submission) -> anyhow::Result<i64>;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        use mailform_db::table::ContactSubmission;
        use sea_query::{Expr, ExprTrait, Func, Order, Query, SqliteQueryBuilder};
        use sea_query_sqlx::SqlxBinder;
        use sqlx::prelude::FromRow;

        #[derive(Debug, Default, Clone, FromRow)]
        pub struct ContactRow {
            pub id: i64,
            pub name: String,
            pub email: String,
            pub subject: String,
            pub message: String,
            pub submitted_at: i64,
            pub responded: bool,
        }

        #[derive(Clone)]
        pub struct SqliteStore(pub sqlx::SqlitePool);

        #[async_trait]
        impl Store for SqliteStore {
            async fn insert(&self, submission: &Submission) -> anyhow::Result<i64> {
                let statement = Query::insert()
                    .into_table(ContactSubmission::Table)
                    .columns([
                        ContactSubmission::Name,
                        ContactSubmission::Email,
                        ContactSubmission::Subject,
                        ContactSubmission::Message,
                        ContactSubmission::SubmittedAt,
                        ContactSubmission::Responded,
                    ])
                    .values_panic([
                        submission.name.to_owned().into(),
                        submission.email.to_owned().into(),
                        submission.subject.to_owned().into(),
                        submission.message.to_owned().into(),
                        submission.submitted_at.into(),
                        false.into(),
                    ])
                    .to_owned();

                let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
                let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

                Ok(result.last_insert_rowid())
            }
        }

        impl SqliteStore {
            fn select() -> sea_query::SelectStatement {
                Query::select()
                    .columns([
                        ContactSubmission::Id,
                        ContactSubmission::Name,
                        ContactSubmission::Email,
                        ContactSubmission::Subject,
                        ContactSubmission::Message,
                        ContactSubmission::SubmittedAt,
                        ContactSubmission::Responded,
                    ])
                    .from(ContactSubmission::Table)
                    .to_owned()
            }

            pub async fn find(&self, id: i64) -> anyhow::Result<Option<ContactRow>> {
                let statement = Self::select()
                    .and_where(Expr::col(ContactSubmission::Id).eq(id))
                    .limit(1)
                    .to_owned();

                let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

                Ok(sqlx::query_as_with::<_, ContactRow, _>(&sql, values)
                    .fetch_optional(&self.0)
                    .await?)
            }

            /// Most recent submissions first.
            pub async fn list(&self, limit: u64) -> anyhow::Result<Vec<ContactRow>> {
                let statement = Self::select()
                    .order_by(ContactSubmission::SubmittedAt, Order::Desc)
                    .order_by(ContactSubmission::Id, Order::Desc)
                    .limit(limit)
                    .to_owned();

                let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

                Ok(sqlx::query_as_with::<_, ContactRow, _>(&sql, values)
                    .fetch_all(&self.0)
                    .await?)
            }

            pub async fn count(&self) -> anyhow::Result<i64> {
                let statement = Query::select()
                    .expr(Func::count(Expr::col(ContactSubmission::Id)))
                    .from(ContactSubmission::Table)
                    .to_owned();

                let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
                let (total,): (i64,) = sqlx::query_as_with(&sql, values)
                    .fetch_one(&self.0)
                    .await?;

                Ok(total)
            }
        }
    }
}

use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum ContactSubmission {
    Table,
    Id,
    Name,
    Email,
    Subject,
    Message,
    SubmittedAt,
    Responded,
}

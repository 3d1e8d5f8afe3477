use color_eyre::eyre::eyre;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    PgPool, Postgres, Row,
};

use crate::{
    app_state::MemberNotifierType,
    domain::{
        validate_member, Member, MemberFields, MemberId, MemberStore,
        MemberStoreError,
    },
    services::member_notifier::dispatch_member_created,
};

pub const SELECT_MEMBERS: &str =
    "SELECT id, name, type, role, duration, tags FROM members";
pub const SELECT_MEMBER_BY_ID: &str =
    "SELECT id, name, type, role, duration, tags FROM members WHERE id = $1";
pub const INSERT_MEMBER: &str = "INSERT INTO members \
    (name, type, role, duration, tags) \
    VALUES ($1, $2, $3, $4, $5) RETURNING id";
pub const UPDATE_MEMBER: &str = "UPDATE members SET \
    name = $1, type = $2, role = $3, duration = $4, tags = $5 \
    WHERE id = $6";
pub const DELETE_MEMBER: &str = "DELETE FROM members WHERE id = $1";

pub struct PostgresMemberStore {
    pool: PgPool,
    notifier: Option<MemberNotifierType>,
}

impl PostgresMemberStore {
    pub fn new(pool: PgPool, notifier: MemberNotifierType) -> Self {
        Self {
            pool,
            notifier: Some(notifier),
        }
    }

    pub fn without_notifier(pool: PgPool) -> Self {
        Self {
            pool,
            notifier: None,
        }
    }
}

/// One row of the `members` table. `tags` is a `TEXT[]` column.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MemberRow {
    pub id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    pub member_type: String,
    pub role: String,
    pub duration: i32,
    pub tags: Option<Vec<String>>,
}

impl From<&Member> for MemberRow {
    fn from(member: &Member) -> Self {
        Self {
            id: *member.id.as_ref(),
            name: member.name.as_ref().to_owned(),
            member_type: member.kind.member_type().as_str().to_owned(),
            role: member.kind.role().to_owned(),
            duration: member.kind.duration(),
            tags: Some(member.tags.clone()),
        }
    }
}

/// A value bound to one of the member column placeholders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnValue<'a> {
    Text(&'a str),
    Integer(i32),
    TextArray(&'a [String]),
}

impl MemberRow {
    /// The writable columns with their values, in the order of the
    /// `$1..$5` placeholders of [`INSERT_MEMBER`] and [`UPDATE_MEMBER`].
    pub fn column_values(&self) -> [(&'static str, ColumnValue<'_>); 5] {
        let tags = self.tags.as_deref().unwrap_or_default();
        [
            ("name", ColumnValue::Text(&self.name)),
            ("type", ColumnValue::Text(&self.member_type)),
            ("role", ColumnValue::Text(&self.role)),
            ("duration", ColumnValue::Integer(self.duration)),
            ("tags", ColumnValue::TextArray(tags)),
        ]
    }
}

fn bind_columns<'q>(
    query: Query<'q, Postgres, PgArguments>,
    row: &'q MemberRow,
) -> Query<'q, Postgres, PgArguments> {
    row.column_values()
        .into_iter()
        .fold(query, |query, (_, value)| match value {
            ColumnValue::Text(text) => query.bind(text),
            ColumnValue::Integer(number) => query.bind(number),
            ColumnValue::TextArray(texts) => query.bind(texts),
        })
}

impl TryFrom<MemberRow> for Member {
    type Error = MemberStoreError;

    /// Stored rows go through the same rules as incoming requests; a row
    /// that breaks them is corrupt data.
    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let id = MemberId::new(row.id);
        let fields = MemberFields {
            name: Some(row.name),
            member_type: Some(row.member_type),
            role: Some(row.role),
            duration: Some(row.duration),
            tags: row.tags,
        };
        validate_member(fields).map(|member| member.with_id(id)).map_err(
            |e| {
                MemberStoreError::UnexpectedError(
                    eyre!(e).wrap_err(format!("Invalid member row: {id}")),
                )
            },
        )
    }
}

#[async_trait::async_trait]
impl MemberStore for PostgresMemberStore {
    #[tracing::instrument(name = "Getting members from PostgreSQL", skip_all)]
    async fn get_members(&self) -> Result<Vec<Member>, MemberStoreError> {
        let rows = sqlx::query_as::<_, MemberRow>(SELECT_MEMBERS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        rows.into_iter().map(Member::try_from).collect()
    }

    #[tracing::instrument(name = "Getting member from PostgreSQL", skip_all)]
    async fn get_member(
        &self,
        id: &MemberId,
    ) -> Result<Member, MemberStoreError> {
        sqlx::query_as::<_, MemberRow>(SELECT_MEMBER_BY_ID)
            .bind(id.as_ref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?
            .ok_or(MemberStoreError::MemberNotFound)
            .and_then(Member::try_from)
    }

    #[tracing::instrument(name = "Adding member to PostgreSQL", skip_all)]
    async fn add_member(
        &self,
        member: Member,
    ) -> Result<Member, MemberStoreError> {
        let row = MemberRow::from(&member);

        let id = bind_columns(sqlx::query(INSERT_MEMBER), &row)
            .fetch_one(&self.pool)
            .await
            .and_then(|inserted: PgRow| inserted.try_get::<i32, _>("id"))
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        let member = member.with_id(MemberId::new(id));

        if let Some(notifier) = &self.notifier {
            dispatch_member_created(notifier.clone(), member.name.clone());
        }

        Ok(member)
    }

    #[tracing::instrument(name = "Updating member in PostgreSQL", skip_all)]
    async fn update_member(
        &self,
        member: &Member,
    ) -> Result<(), MemberStoreError> {
        let row = MemberRow::from(member);

        let result = bind_columns(sqlx::query(UPDATE_MEMBER), &row)
            .bind(row.id)
            .execute(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(MemberStoreError::MemberNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Deleting member from PostgreSQL", skip_all)]
    async fn delete_member(
        &self,
        id: &MemberId,
    ) -> Result<(), MemberStoreError> {
        let result = sqlx::query(DELETE_MEMBER)
            .bind(id.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(MemberStoreError::MemberNotFound);
        }
        Ok(())
    }
}

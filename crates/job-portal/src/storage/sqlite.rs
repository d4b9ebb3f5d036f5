use async_trait::async_trait;
use chrono::Utc;
use sqlx::query_builder::Separated;
use sqlx::sqlite::SqlitePool;
use sqlx::{Encode, QueryBuilder, Sqlite, Type};

use super::RepositoryError;
use crate::applications::{
    ApplicantView, Application, ApplicationId, ApplicationOwnership, ApplicationStatus,
    ApplicationStore, ApplyOutcome, StudentApplicationView,
};
use crate::auth::{InitialProfile, NewAccount, User, UserId, UserStore};
use crate::jobs::{JobDraft, JobId, JobListing, JobSearch, JobStore, JobUpdate, RecruiterJob};
use crate::profiles::{
    ProfileStore, RecruiterProfile, RecruiterProfileUpdate, StudentProfile, StudentProfileUpdate,
};

const LISTING_QUERY: &str = "SELECT j.*, rp.company_name, rp.company_description \
     FROM jobs j \
     JOIN recruiter_profiles rp ON j.recruiter_id = rp.user_id \
     WHERE j.id = ? AND j.is_active = 1";

/// All stores on one SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A migrated private in-memory database.
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let pool = super::connect_in_memory().await?;
        super::migrate(&pool)
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Cheap liveness probe used by the readiness endpoint.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Adds `column = ?` to an UPDATE's SET list when the value is present.
fn assign<'args, T>(
    fields: &mut Separated<'_, 'args, Sqlite, &'static str>,
    column: &str,
    value: &Option<T>,
) where
    T: Clone + Send + 'args + Encode<'args, Sqlite> + Type<Sqlite>,
{
    if let Some(value) = value {
        fields
            .push(format_args!("{column} = "))
            .push_bind_unseparated(value.clone());
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_account(&self, account: NewAccount) -> Result<User, RepositoryError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, role, created_at) VALUES (?, ?, ?, ?) \
             RETURNING id, email, password_hash, role, created_at",
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.profile.role())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        match &account.profile {
            InitialProfile::Student { name } => {
                sqlx::query(
                    "INSERT INTO student_profiles (user_id, name, created_at, updated_at) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(user.id)
                .bind(name)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
            InitialProfile::Recruiter { company_name } => {
                sqlx::query(
                    "INSERT INTO recruiter_profiles (user_id, company_name, created_at, updated_at) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(user.id)
                .bind(company_name)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(user)
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn student_profile(
        &self,
        user: UserId,
    ) -> Result<Option<StudentProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            "SELECT * FROM student_profiles WHERE user_id = ?",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn update_student_profile(
        &self,
        user: UserId,
        update: &StudentProfileUpdate,
    ) -> Result<Option<StudentProfile>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE student_profiles SET ");
        let mut fields = query.separated(", ");
        assign(&mut fields, "name", &update.name);
        assign(&mut fields, "education", &update.education);
        assign(&mut fields, "skills", &update.skills);
        assign(&mut fields, "location", &update.location);
        assign(&mut fields, "expected_salary", &update.expected_salary);
        assign(&mut fields, "bio", &update.bio);
        assign(&mut fields, "phone", &update.phone);
        fields.push("updated_at = ").push_bind_unseparated(Utc::now());
        query.push(" WHERE user_id = ").push_bind(user);

        if query.build().execute(&self.pool).await?.rows_affected() == 0 {
            return Ok(None);
        }
        self.student_profile(user).await
    }

    async fn replace_cv(
        &self,
        user: UserId,
        filename: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE student_profiles SET updated_at = ? WHERE user_id = ?")
            .bind(now)
            .bind(user)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let (previous,): (Option<String>,) =
            sqlx::query_as("SELECT cv_filename FROM student_profiles WHERE user_id = ?")
                .bind(user)
                .fetch_one(&mut *tx)
                .await?;
        sqlx::query("UPDATE student_profiles SET cv_filename = ? WHERE user_id = ?")
            .bind(filename)
            .bind(user)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(previous)
    }

    async fn recruiter_profile(
        &self,
        user: UserId,
    ) -> Result<Option<RecruiterProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, RecruiterProfile>(
            "SELECT * FROM recruiter_profiles WHERE user_id = ?",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn update_recruiter_profile(
        &self,
        user: UserId,
        update: &RecruiterProfileUpdate,
    ) -> Result<Option<RecruiterProfile>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE recruiter_profiles SET ");
        let mut fields = query.separated(", ");
        assign(&mut fields, "company_name", &update.company_name);
        assign(&mut fields, "company_description", &update.company_description);
        assign(&mut fields, "location", &update.location);
        assign(&mut fields, "contact_person", &update.contact_person);
        assign(&mut fields, "phone", &update.phone);
        assign(&mut fields, "website", &update.website);
        fields.push("updated_at = ").push_bind_unseparated(Utc::now());
        query.push(" WHERE user_id = ").push_bind(user);

        if query.build().execute(&self.pool).await?.rows_affected() == 0 {
            return Ok(None);
        }
        self.recruiter_profile(user).await
    }
}

#[async_trait]
impl JobStore for SqliteStore {
    async fn insert_job(
        &self,
        recruiter: UserId,
        draft: JobDraft,
    ) -> Result<JobId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO jobs (recruiter_id, title, description, skills_required, location, \
             salary, work_mode, job_type, deadline, posted_at, is_active) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(recruiter)
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.skills_required)
        .bind(draft.location)
        .bind(draft.salary)
        .bind(draft.work_mode)
        .bind(draft.job_type)
        .bind(draft.deadline)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(JobId(result.last_insert_rowid()))
    }

    async fn find_active_job(&self, id: JobId) -> Result<Option<JobListing>, RepositoryError> {
        let listing = sqlx::query_as::<_, JobListing>(LISTING_QUERY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<JobListing>, RepositoryError> {
        let mut query = search.build();
        let jobs = query
            .build_query_as::<JobListing>()
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn jobs_for_recruiter(
        &self,
        recruiter: UserId,
    ) -> Result<Vec<RecruiterJob>, RepositoryError> {
        let jobs = sqlx::query_as::<_, RecruiterJob>(
            "SELECT j.*, COUNT(a.id) AS application_count \
             FROM jobs j \
             LEFT JOIN applications a ON a.job_id = j.id \
             WHERE j.recruiter_id = ? \
             GROUP BY j.id \
             ORDER BY j.posted_at DESC, j.id DESC",
        )
        .bind(recruiter)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn update_job(&self, id: JobId, update: &JobUpdate) -> Result<bool, RepositoryError> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE jobs SET ");
        let mut fields = query.separated(", ");
        assign(&mut fields, "title", &update.title);
        assign(&mut fields, "description", &update.description);
        assign(&mut fields, "skills_required", &update.skills_required);
        assign(&mut fields, "location", &update.location);
        assign(&mut fields, "salary", &update.salary);
        assign(&mut fields, "work_mode", &update.work_mode);
        assign(&mut fields, "job_type", &update.job_type);
        assign(&mut fields, "deadline", &update.deadline);
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND is_active = 1");

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn deactivate_job(&self, id: JobId, recruiter: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE jobs SET is_active = 0 WHERE id = ? AND recruiter_id = ? AND is_active = 1",
        )
        .bind(id)
        .bind(recruiter)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationStore for SqliteStore {
    async fn insert_application(
        &self,
        job: JobId,
        student: UserId,
        cover_letter: Option<String>,
    ) -> Result<ApplyOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // The write comes first so the transaction takes the write lock before any read.
        let inserted = sqlx::query(
            "INSERT INTO applications (job_id, student_id, cover_letter, status, applied_at) \
             SELECT ?, ?, ?, ?, ? \
             WHERE EXISTS (SELECT 1 FROM jobs WHERE id = ? AND is_active = 1) \
             AND NOT EXISTS (SELECT 1 FROM applications WHERE job_id = ? AND student_id = ?)",
        )
        .bind(job)
        .bind(student)
        .bind(cover_letter)
        .bind(ApplicationStatus::Pending)
        .bind(Utc::now())
        .bind(job)
        .bind(job)
        .bind(student)
        .execute(&mut *tx)
        .await;

        let inserted = match inserted.map_err(RepositoryError::from) {
            Ok(result) => result,
            Err(RepositoryError::Conflict) => return Ok(ApplyOutcome::Duplicate),
            Err(other) => return Err(other),
        };

        if inserted.rows_affected() == 1 {
            let id = ApplicationId(inserted.last_insert_rowid());
            tx.commit().await?;
            return Ok(ApplyOutcome::Created(id));
        }

        let (duplicate,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = ? AND student_id = ?)",
        )
        .bind(job)
        .bind(student)
        .fetch_one(&mut *tx)
        .await?;
        tx.rollback().await?;

        Ok(if duplicate {
            ApplyOutcome::Duplicate
        } else {
            ApplyOutcome::JobUnavailable
        })
    }

    async fn applications_for_job(
        &self,
        job: JobId,
    ) -> Result<Vec<ApplicantView>, RepositoryError> {
        let applications = sqlx::query_as::<_, ApplicantView>(
            "SELECT a.*, sp.name, sp.phone, sp.education, sp.skills, sp.cv_filename, u.email \
             FROM applications a \
             JOIN student_profiles sp ON a.student_id = sp.user_id \
             JOIN users u ON a.student_id = u.id \
             WHERE a.job_id = ? \
             ORDER BY a.applied_at DESC, a.id DESC",
        )
        .bind(job)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn applications_for_student(
        &self,
        student: UserId,
    ) -> Result<Vec<StudentApplicationView>, RepositoryError> {
        let applications = sqlx::query_as::<_, StudentApplicationView>(
            "SELECT a.*, j.title, j.description, j.location, j.salary, rp.company_name \
             FROM applications a \
             JOIN jobs j ON a.job_id = j.id \
             JOIN recruiter_profiles rp ON j.recruiter_id = rp.user_id \
             WHERE a.student_id = ? \
             ORDER BY a.applied_at DESC, a.id DESC",
        )
        .bind(student)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn find_application_with_owner(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationOwnership>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            application: Application,
            recruiter_id: UserId,
        }

        let row = sqlx::query_as::<_, Row>(
            "SELECT a.*, j.recruiter_id \
             FROM applications a \
             JOIN jobs j ON a.job_id = j.id \
             WHERE a.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ApplicationOwnership {
            application: row.application,
            recruiter_id: row.recruiter_id,
        }))
    }

    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        expected: Option<ApplicationStatus>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE applications SET status = ? WHERE id = ? AND (? IS NULL OR status = ?)",
        )
        .bind(status)
        .bind(id)
        .bind(expected)
        .bind(expected)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

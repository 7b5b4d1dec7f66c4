use crate::entities::prelude::*;
use crate::entities::users;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@example.com";
/// Change after first login.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "Admin123!";

fn hash_bootstrap_password() -> Result<String, DbErr> {
    crate::db::repositories::user::hash_password(BOOTSTRAP_ADMIN_PASSWORD, None)
        .map_err(|e| DbErr::Custom(format!("Failed to hash bootstrap password: {e}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_bootstrap_password()?;

        let insert = Query::insert()
            .into_table(Users)
            .columns([
                users::Column::Username,
                users::Column::Email,
                users::Column::PasswordHash,
                users::Column::IsAdmin,
                users::Column::CreatedAt,
            ])
            .values_panic([
                BOOTSTRAP_ADMIN_USERNAME.into(),
                BOOTSTRAP_ADMIN_EMAIL.into(),
                password_hash.into(),
                true.into(),
                now.into(),
            ])
            .on_conflict(OnConflict::column(users::Column::Username).do_nothing().to_owned())
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Users)
            .and_where(Expr::col(users::Column::Username).eq(BOOTSTRAP_ADMIN_USERNAME))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}

use crate::core::catalog::Catalog;
use crate::core::membership::Membership;
use crate::domain::model::Snapshot;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Persistence collaborator used by the session.
pub trait Repository {
    fn load(&self) -> Result<Snapshot>;
    fn save(&self, catalog: &Catalog, membership: &Membership) -> Result<()>;
}

pub trait ConfigProvider {
    fn books_path(&self) -> PathBuf;
    fn members_path(&self) -> PathBuf;
    fn session_title(&self) -> &str;
}

impl<T: Repository + ?Sized> Repository for &T {
    fn load(&self) -> Result<Snapshot> {
        (**self).load()
    }

    fn save(&self, catalog: &Catalog, membership: &Membership) -> Result<()> {
        (**self).save(catalog, membership)
    }
}

//! Durable storage seam for puppet records.

use crate::Result as PuppetErrorResult;

use mp_core::PuppetRecord;
use mp_db::PuppetRepository;

use async_trait::async_trait;

#[async_trait]
pub trait PuppetStore: Send + Sync {
    async fn get_by_remote_id(&self, remote_id: i64) -> PuppetErrorResult<Option<PuppetRecord>>;

    async fn get_by_custom_identity(
        &self,
        identity: &str,
    ) -> PuppetErrorResult<Option<PuppetRecord>>;

    async fn get_all_with_custom_identity(&self) -> PuppetErrorResult<Vec<PuppetRecord>>;

    async fn insert(&self, puppet: &PuppetRecord) -> PuppetErrorResult<()>;

    async fn update(&self, puppet: &PuppetRecord) -> PuppetErrorResult<()>;
}

#[async_trait]
impl PuppetStore for PuppetRepository {
    async fn get_by_remote_id(&self, remote_id: i64) -> PuppetErrorResult<Option<PuppetRecord>> {
        Ok(self.find_by_remote_id(remote_id).await?)
    }

    async fn get_by_custom_identity(
        &self,
        identity: &str,
    ) -> PuppetErrorResult<Option<PuppetRecord>> {
        Ok(self.find_by_custom_identity(identity).await?)
    }

    async fn get_all_with_custom_identity(&self) -> PuppetErrorResult<Vec<PuppetRecord>> {
        Ok(self.find_all_with_custom_identity().await?)
    }

    async fn insert(&self, puppet: &PuppetRecord) -> PuppetErrorResult<()> {
        Ok(self.create(puppet).await?)
    }

    async fn update(&self, puppet: &PuppetRecord) -> PuppetErrorResult<()> {
        Ok(PuppetRepository::update(self, puppet).await?)
    }
}

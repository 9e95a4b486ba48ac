use pairmatch_protocol::Record;

use crate::*;

/// Reads `R` from its key; malformed data comes back as `None`, backend failures as errors.
pub async fn load_record<R: Record>(gateway: &dyn PersistenceGateway) -> Result<Option<R>> {
    let value = gateway
        .get(R::KEY)
        .await
        .map_err(SessionError::persistence(R::KEY))?;
    Ok(R::from_stored(value))
}

/// Validates and writes `record`, replacing whatever was stored at its key.
pub async fn save_record<R: Record>(gateway: &dyn PersistenceGateway, record: &R) -> Result<()> {
    let value = record.to_json()?;
    gateway
        .set(R::KEY, value)
        .await
        .map_err(SessionError::persistence(R::KEY))
}

use crate::traits::Serializer;
use cadence_core::CadenceResult;

/// JSON serializer for the persisted engine state
pub struct JsonSerializer;

impl<T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync> Serializer<T>
    for JsonSerializer
{
    fn serialize(&self, data: &T) -> CadenceResult<Vec<u8>> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| cadence_core::CadenceError::Serialization(e.to_string()))?;
        Ok(json)
    }

    fn deserialize(&self, bytes: &[u8]) -> CadenceResult<T> {
        let data = serde_json::from_slice(bytes)
            .map_err(|e| cadence_core::CadenceError::Serialization(e.to_string()))?;
        Ok(data)
    }
}

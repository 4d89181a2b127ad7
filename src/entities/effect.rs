//! Effects attached to items.
//!
//! Known kinds:
//! - `Effect.1`: plain named effect, no timing impact
//! - `LinearTimeWarp.1`: constant speed change (`time_scalar`)
//! - `FreezeFrame.1`: hold a single frame (time scalar 0)
//!
//! Any other schema in an item's effect list is carried as `Unknown`.

use super::any::AnyDictionary;
use super::keys::{K_EFFECT_NAME, K_METADATA, K_NAME, K_TIME_SCALAR};
use super::object::{SchemaId, Serializable, SerializableObject};
use crate::error::Result;

pub const EFFECT_SCHEMA_NAME: &str = "Effect";
pub const LINEAR_TIME_WARP_SCHEMA_NAME: &str = "LinearTimeWarp";
pub const FREEZE_FRAME_SCHEMA_NAME: &str = "FreezeFrame";

#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    Plain,
    LinearTimeWarp { time_scalar: f64 },
    FreezeFrame,
    Unknown(SerializableObject),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub name: String,
    pub effect_name: String,
    pub metadata: AnyDictionary,
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(name: impl Into<String>, effect_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effect_name: effect_name.into(),
            metadata: AnyDictionary::new(),
            kind: EffectKind::Plain,
        }
    }

    pub fn linear_time_warp(name: impl Into<String>, time_scalar: f64) -> Self {
        Self {
            kind: EffectKind::LinearTimeWarp { time_scalar },
            ..Self::new(name, LINEAR_TIME_WARP_SCHEMA_NAME)
        }
    }

    pub fn freeze_frame(name: impl Into<String>) -> Self {
        Self { kind: EffectKind::FreezeFrame, ..Self::new(name, FREEZE_FRAME_SCHEMA_NAME) }
    }

    /// Playback speed multiplier, `None` for effects without timing.
    pub fn time_scalar(&self) -> Option<f64> {
        match self.kind {
            EffectKind::LinearTimeWarp { time_scalar } => Some(time_scalar),
            EffectKind::FreezeFrame => Some(0.0),
            _ => None,
        }
    }
}

impl Serializable for Effect {
    fn schema_id(&self) -> SchemaId {
        match &self.kind {
            EffectKind::Plain => SchemaId::new(EFFECT_SCHEMA_NAME, 1),
            EffectKind::LinearTimeWarp { .. } => SchemaId::new(LINEAR_TIME_WARP_SCHEMA_NAME, 1),
            EffectKind::FreezeFrame => SchemaId::new(FREEZE_FRAME_SCHEMA_NAME, 1),
            EffectKind::Unknown(obj) => obj.schema().clone(),
        }
    }

    fn to_object(&self) -> SerializableObject {
        if let EffectKind::Unknown(obj) = &self.kind {
            return obj.clone();
        }
        let mut f = AnyDictionary::new();
        f.set(K_METADATA, self.metadata.clone());
        f.set(K_NAME, self.name.as_str());
        f.set(K_EFFECT_NAME, self.effect_name.as_str());
        match self.kind {
            EffectKind::LinearTimeWarp { time_scalar } => f.set(K_TIME_SCALAR, time_scalar),
            EffectKind::FreezeFrame => f.set(K_TIME_SCALAR, 0.0),
            _ => {}
        }
        SerializableObject::new(self.schema_id(), f)
    }

    fn from_object(obj: SerializableObject) -> Result<Self> {
        let f = obj.fields();
        let name = f.get_str(K_NAME)?.unwrap_or_default().to_string();
        let effect_name = f.get_str(K_EFFECT_NAME)?.unwrap_or_default().to_string();
        let metadata = f.get_dictionary(K_METADATA)?.cloned().unwrap_or_default();
        let kind = match obj.schema_name() {
            EFFECT_SCHEMA_NAME => EffectKind::Plain,
            LINEAR_TIME_WARP_SCHEMA_NAME => {
                EffectKind::LinearTimeWarp { time_scalar: f.get_number_or(K_TIME_SCALAR, 1.0)? }
            }
            FREEZE_FRAME_SCHEMA_NAME => EffectKind::FreezeFrame,
            _ => {
                log::debug!("keeping effect of unknown schema {} as passthrough", obj.schema());
                EffectKind::Unknown(obj.clone())
            }
        };
        Ok(Self { name, effect_name, metadata, kind })
    }
}

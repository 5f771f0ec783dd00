//! Card catalog: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Immutable card data with typed effect fields
//! - `CardInstance`: One copy of a card in a deck, with combat-scoped tweaks
//! - `CardRegistry`: Catalog lookup

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{
    CardDefinition, CardId, ComboSpec, CopyDestination, CostModifier, CostScope, Rarity,
    ScalingSpec, SelectionRule, StatusGrant, TransformSpec,
};
pub use instance::CardInstance;
pub use registry::CardRegistry;

//! EDMX/CSDL metadata: XML reading, digestion into a [`DataModel`], and the
//! per-endpoint model cache.

mod cache;
mod digest;
mod error;
mod model;
mod source;
pub mod xml;

pub use cache::ModelCache;
pub use digest::{DigestOptions, Digester, SchemaDocument, digest};
pub use error::{DigestionError, MetadataError};
pub use model::{
    ComplexType, ContainerMember, DataModel, EntityContainer, EntitySet, EntityType, NameCollision,
    Namespace, NavigationPropertyModel, OperationImport, PropertyModel, Singleton,
    StructuredType, TypeRef,
};
pub use source::{FileSource, MetadataSource, StaticSource, normalize_endpoint};

//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod batch;
pub mod machine;
pub mod material_input;
pub mod material_price_category;
pub mod material_price_tier;
pub mod operation;
pub mod part;
pub mod quote;
pub mod quote_item;

// Re-export specific types to avoid conflicts
pub use batch::{Column as BatchColumn, Entity as Batch, Model as BatchModel};
pub use machine::{Column as MachineColumn, Entity as Machine, Model as MachineModel};
pub use material_input::{
    Column as MaterialInputColumn, Entity as MaterialInput, Model as MaterialInputModel,
    StockShape,
};
pub use material_price_category::{
    Column as MaterialPriceCategoryColumn, Entity as MaterialPriceCategory,
    Model as MaterialPriceCategoryModel,
};
pub use material_price_tier::{
    Column as MaterialPriceTierColumn, Entity as MaterialPriceTier,
    Model as MaterialPriceTierModel,
};
pub use operation::{Column as OperationColumn, Entity as Operation, Model as OperationModel};
pub use part::{Column as PartColumn, Entity as Part, Model as PartModel};
pub use quote::{Column as QuoteColumn, Entity as Quote, Model as QuoteModel};
pub use quote_item::{Column as QuoteItemColumn, Entity as QuoteItem, Model as QuoteItemModel};

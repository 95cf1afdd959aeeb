pub mod awards;
pub mod dispatch;
pub mod meta;
pub mod organizers;
pub mod paginate;
pub mod revise;
pub mod schema;
pub mod sheet2json;
pub mod shared;
pub mod update;
pub mod validate;

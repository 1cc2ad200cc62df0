pub use self::{
    generate::{generate_pages, GenerateOptions, Summary},
    template::Template,
};

pub mod generate;
pub mod template;

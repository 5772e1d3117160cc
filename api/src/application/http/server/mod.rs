pub mod api_entities;

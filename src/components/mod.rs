pub mod abstract_map;

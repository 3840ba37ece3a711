pub mod city_lookup;
pub mod debounce;
pub mod error;

pub mod test_properties;
pub mod test_scenarios;

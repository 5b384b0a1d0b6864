pub mod test_matching;

pub mod test_suite;

#[cfg(test)]
mod cpu_ref;

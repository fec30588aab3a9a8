//! Walks a `DynamicArray` through `reserve` and `resize`, logging its length and
//! capacity after each step.
//!
//! Run with `RUST_LOG=info` to see the report, or `RUST_LOG=trace` to also see each
//! reallocation.

use dynarray::{dynarray, DynamicArray, Error};
use log::{debug, info};

fn report<T: std::fmt::Display>(label: &str, array: &DynamicArray<T>) {
    info!("{label}: capacity is {}, size is {}", array.capacity(), array.len());
    let elements: Vec<String> = array.iter().map(|x| x.to_string()).collect();
    info!("{}", elements.join(" "));
}

fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    let mut array = dynarray![1, 2, 3, 4, 5];
    report("initial", &array);

    debug!("reserving 10 slots");
    array.reserve(10);
    report("after reserve(10)", &array);

    debug!("resizing to 11 elements");
    array.resize(11);
    report("after resize(11)", &array);

    let last = array.at(array.len() - 1)?;
    info!("last element is {last}");

    if let Err(err) = array.at(array.len()) {
        info!("checked access past the end: {err}");
    }

    Ok(())
}

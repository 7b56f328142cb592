mod array;
mod inner;
mod lifecycle;
mod traits;

#[cfg(test)]
mod tests;

pub use array::SlackArr;

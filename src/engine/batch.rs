// file: src/engine/batch.rs
// description: contiguous fixed-size partitioning of filtered documents

/// Splits `items` into contiguous chunks of at most `size`. A size of zero is
/// treated as one.
pub fn batch<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}

pub fn batch_count(len: usize, size: usize) -> usize {
    len.div_ceil(size.max(1))
}

use rust_oned::tools::{bench_limit_from_env, dataset_iter, dataset_root_from_env, load_rgb, smoke_from_env};
use std::path::PathBuf;

pub fn collect_dataset_images() -> (PathBuf, Vec<PathBuf>) {
    let root = dataset_root_from_env();
    let limit = bench_limit_from_env();
    let smoke = smoke_from_env();

    let images: Vec<PathBuf> = dataset_iter(&root, limit, smoke).collect();
    (root, images)
}

/// Dataset images that load, as (name, rgb, width, height)
pub fn load_dataset() -> Vec<(String, Vec<u8>, usize, usize)> {
    let (root, images) = collect_dataset_images();
    images
        .into_iter()
        .filter_map(|path| {
            let (rgb, width, height) = load_rgb(&path).ok()?;
            let name = path
                .strip_prefix(&root)
                .unwrap_or(&path)
                .display()
                .to_string();
            Some((name, rgb, width, height))
        })
        .collect()
}

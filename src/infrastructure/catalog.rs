//! 图片目录 - 基础设施层
//!
//! 只读地列出可评分的图片文件名

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tracing::debug;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// 判断文件扩展名是否为可评分图片（不区分大小写）
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 图片目录
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    dir: PathBuf,
}

impl ImageCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 图片标识对应的完整路径
    pub fn image_path(&self, image: &str) -> PathBuf {
        self.dir.join(image)
    }

    /// 列出目录中的所有图片文件名
    ///
    /// 顺序为文件系统原生顺序，不保证跨平台稳定。
    /// 目录不存在时返回 `CatalogUnavailable`，没有图片时返回空列表。
    pub fn list_images(&self) -> AppResult<Vec<String>> {
        if !self.dir.is_dir() {
            return Err(AppError::CatalogUnavailable {
                path: self.dir.display().to_string(),
            });
        }

        let read_dir = std::fs::read_dir(&self.dir).map_err(|_| AppError::CatalogUnavailable {
            path: self.dir.display().to_string(),
        })?;

        let mut images = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };

            // 跟随符号链接，指向图片的链接也算作图片
            let path = entry.path();
            if path.is_file() && is_image_file(&path) {
                images.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        debug!("目录 {} 中找到 {} 张图片", self.dir.display(), images.len());
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        assert!(is_image_file(Path::new("a.PNG")));
        assert!(is_image_file(Path::new("b.JpEg")));
        assert!(is_image_file(Path::new("c.gif")));
        assert!(!is_image_file(Path::new("d.webp")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("png")));
    }

    #[test]
    fn test_list_images_skips_other_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.JPG", "readme.md"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let mut images = ImageCatalog::new(dir.path()).list_images().unwrap();
        images.sort();
        assert_eq!(images, vec!["a.png".to_string(), "b.JPG".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_images_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let catalog_dir = dir.path().join("raw_img");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&catalog_dir).unwrap();
        std::fs::write(source.join("linked.png"), b"x").unwrap();
        std::fs::write(catalog_dir.join("plain.png"), b"x").unwrap();
        std::os::unix::fs::symlink(source.join("linked.png"), catalog_dir.join("linked.png"))
            .unwrap();
        std::os::unix::fs::symlink(source.join("missing.png"), catalog_dir.join("broken.png"))
            .unwrap();

        let mut images = ImageCatalog::new(&catalog_dir).list_images().unwrap();
        images.sort();
        assert_eq!(images, vec!["linked.png".to_string(), "plain.png".to_string()]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageCatalog::new(dir.path()).list_images().unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ImageCatalog::new(dir.path().join("missing"));
        assert!(matches!(
            catalog.list_images(),
            Err(AppError::CatalogUnavailable { .. })
        ));
    }
}

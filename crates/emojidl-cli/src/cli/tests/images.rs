//! Tests for the images and inspect subcommands.

use super::parse;
use crate::cli::commands::images::{image_options, ImageArgs};
use crate::cli::CliCommand;
use emojidl_core::config::EmojidlConfig;
use std::path::PathBuf;

#[test]
fn cli_parse_images_defaults() {
    match parse(&["emojidl", "images"]) {
        CliCommand::Images {
            paths,
            list,
            data_dir,
            out_dir,
            concurrency,
            overwrite,
        } => {
            assert!(paths.is_empty());
            assert!(list.is_none());
            assert!(data_dir.is_none());
            assert!(out_dir.is_none());
            assert!(concurrency.is_none());
            assert!(!overwrite);
        }
        _ => panic!("expected Images"),
    }
}

#[test]
fn cli_parse_images_paths_and_flags() {
    match parse(&[
        "emojidl",
        "images",
        "data/207070.js",
        "data/205281.js",
        "--out-dir",
        "/tmp/out",
        "--concurrency",
        "4",
        "--overwrite",
    ]) {
        CliCommand::Images {
            paths,
            out_dir,
            concurrency,
            overwrite,
            ..
        } => {
            assert_eq!(
                paths,
                vec![
                    PathBuf::from("data/207070.js"),
                    PathBuf::from("data/205281.js")
                ]
            );
            assert_eq!(out_dir, Some(PathBuf::from("/tmp/out")));
            assert_eq!(concurrency, Some(4));
            assert!(overwrite);
        }
        _ => panic!("expected Images with flags"),
    }
}

#[test]
fn cli_parse_images_list() {
    match parse(&["emojidl", "images", "--list", "packs.txt"]) {
        CliCommand::Images { list, paths, .. } => {
            assert_eq!(list, Some(PathBuf::from("packs.txt")));
            assert!(paths.is_empty());
        }
        _ => panic!("expected Images with --list"),
    }
}

#[test]
fn cli_parse_inspect() {
    match parse(&["emojidl", "inspect", "data/213443.js"]) {
        CliCommand::Inspect { path } => assert_eq!(path, PathBuf::from("data/213443.js")),
        _ => panic!("expected Inspect"),
    }
}

#[test]
fn image_flags_override_config() {
    let cfg = EmojidlConfig::default();
    let args = ImageArgs {
        out_dir: Some(PathBuf::from("imgs")),
        concurrency: Some(3),
        overwrite: true,
        ..ImageArgs::default()
    };
    let opts = image_options(&cfg, &args);
    assert_eq!(opts.out_dir, PathBuf::from("imgs"));
    assert_eq!(opts.concurrency, 3);
    assert!(opts.overwrite);
    assert_eq!(opts.image_url_template, cfg.image_url_template);
}

#[test]
fn image_zero_concurrency_flag_is_rejected() {
    let cfg = EmojidlConfig::default();
    let args = ImageArgs {
        concurrency: Some(0),
        ..Default::default()
    };
    assert!(image_options(&cfg, &args).validate().is_err());
}

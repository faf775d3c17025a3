// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CRD YAML Generator
//!
//! Generates the `ClassificationRule` CRD from the Rust types in src/crd.rs, so
//! the manifest in deploy/crds/ never drifts from the code.
//!
//! Usage:
//!   cargo run --bin crdgen            # writes deploy/crds/classificationrules.crd.yaml
//!   cargo run --bin crdgen -- --stdout

use autolabeller::crd::ClassificationRule;
use kube::CustomResourceExt;
use std::fs;
use std::path::Path;

const COPYRIGHT_HEADER: &str = "# Copyright (c) 2025 Erick Bourgeois, firestoned
# SPDX-License-Identifier: MIT
#
# This file is AUTO-GENERATED from src/crd.rs
# DO NOT EDIT MANUALLY - Run `cargo run --bin crdgen` to regenerate
#
";

const OUTPUT_FILE: &str = "classificationrules.crd.yaml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let yaml = serde_yaml::to_string(&ClassificationRule::crd())?;
    let content = format!("{COPYRIGHT_HEADER}{yaml}");

    if std::env::args().any(|arg| arg == "--stdout") {
        print!("{content}");
        return Ok(());
    }

    let output_dir = Path::new("deploy/crds");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join(OUTPUT_FILE);
    fs::write(&output_path, content)?;

    println!("✓ Generated {}", output_path.display());
    println!("\nNext steps:");
    println!("  1. Review the generated file");
    println!("  2. Deploy with: kubectl apply -f deploy/crds/");

    Ok(())
}

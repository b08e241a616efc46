use std::env;

fn main() {
    // Allow CI to stamp a release version, otherwise fall back to the manifest
    let version = env::var("NOGO_ROUTER_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=NOGO_ROUTER_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=NOGO_ROUTER_VERSION");
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

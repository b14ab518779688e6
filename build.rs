use std::{fs::OpenOptions, path::Path};

/// Static pages served by the binary, packed so the server can unpack them at startup
const CLIENT_PATH: &str = "res/client";

fn main() {
    println!("cargo:rerun-if-changed={CLIENT_PATH}");
    let out_dir = std::env::var("OUT_DIR").expect("Failed to find OUT_DIR");
    let client_tarball_path = Path::new(&out_dir).join("client.tar");

    let client_tarball_writer = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(client_tarball_path)
        .expect("Failed to open client tarball");

    let mut tarball = tar::Builder::new(client_tarball_writer);
    tarball
        .append_dir_all(".", CLIENT_PATH)
        .expect("Failed to pack client pages");
    tarball.finish().expect("Failed to finish client tarball");
}

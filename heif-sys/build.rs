use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=HEIF_SYS_NO_PKG_CONFIG");
    println!("cargo:rerun-if-env-changed=HEIF_SYS_LIB_DIR");

    // Explicit library directory overrides everything else.
    if let Ok(dir) = env::var("HEIF_SYS_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
        link_fallback();
        return;
    }

    if env::var_os("HEIF_SYS_NO_PKG_CONFIG").is_none() {
        let probe = pkg_config::Config::new()
            .atleast_version("1.12")
            .probe("libheif");
        match probe {
            // pkg-config already emitted the link directives.
            Ok(_) => return,
            Err(err) => {
                println!("cargo:warning=pkg-config probe for libheif failed: {err}");
            }
        }
    }

    link_fallback();
}

fn link_fallback() {
    // Features reach build scripts as CARGO_FEATURE_* env vars.
    if env::var_os("CARGO_FEATURE_SHARED").is_some() {
        println!("cargo:rustc-link-lib=dylib=heif");
    } else {
        println!("cargo:rustc-link-lib=heif");
    }
}

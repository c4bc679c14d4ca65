fn main() {
    // On-device tests need embedded-test's linker script; host tests must not see it.
    if std::env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("xtensa") {
        println!("cargo::rustc-link-arg-tests=-Tembedded-test.x");
    }
}

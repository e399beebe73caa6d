pub const LOCAL_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_version() {
    println!("kube-stack {LOCAL_VERSION}");
}

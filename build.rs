fn main() {
    // Emits nothing when esp-idf-sys is not in the dependency graph
    // (host builds with no default features).
    embuild::espidf::sysenv::output();
}

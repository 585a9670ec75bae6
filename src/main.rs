fn main() {
    syntest::cli::run();
}

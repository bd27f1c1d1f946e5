fn main() {
    fingerpaint::run();
}

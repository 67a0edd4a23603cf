fn main() {
    plately::run();
}

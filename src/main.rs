fn main() {
    pass_report::cli::run();
}

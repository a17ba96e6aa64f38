fn main() {
    recipes_infra::app::cli::run();
}

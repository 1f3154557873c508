fn main() {
    env_logger::init();
    armature::run();
}

//! Regenerate the checked-in prost code from the .proto sources.
//!
//! Run from this crate's directory. Requires `protoc` on the PATH.

fn main() {
    std::env::set_var("OUT_DIR", "../gossip/proto/gen");
    prost_build::Config::new()
        .bytes(["."])
        .compile_protos(
            &["../gossip/proto/fullsync.gossip.proto"],
            &["../gossip/proto/"],
        )
        .expect("Failed to compile gossip protobuf protocol files");
}

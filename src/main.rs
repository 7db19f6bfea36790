use {aoc_2020::*, clap::Parser};

fn main() {
    solutions().run(&Args::parse());
}

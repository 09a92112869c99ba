#![no_main]

use libfuzzer_sys::fuzz_target;
use ordtree::model::{run_multiset_equivalence, MultisetEquivalenceInput};

fuzz_target!(|input: MultisetEquivalenceInput| {
    run_multiset_equivalence(input.seed, input.ops)
});

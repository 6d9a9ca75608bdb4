use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

#[path = "../tests/common/mod.rs"]
mod common;

fn main() {
    divan::main();
}

pub mod parse {
    use divan::Bencher;
    use nitf_file::{File, ParseOptions};
    use nitf_tre::SchemaRegistry;

    use crate::common::{image_subheader, text_subheader, tre, NitfBuilder, Version, REGISTRY};

    fn get_input() -> Vec<u8> {
        let mut tres = Vec::new();
        for _ in 0..32 {
            tres.extend(tre("TEST_B", "3abcdefghi"));
            tres.extend(tre("UNKNWN", "0123456789"));
        }

        let mut builder = NitfBuilder::new(Version::Nitf21).user_defined_tres(tres, 0);
        for _ in 0..16 {
            builder = builder
                .image(image_subheader(&tre("TEST_A", "01")), &[0u8; 4096])
                .text(text_subheader(Version::Nitf21, &[]), b"bench");
        }
        builder.build()
    }

    #[divan::bench(args = [false, true])]
    fn read(bencher: Bencher, extract: bool) {
        let registry = SchemaRegistry::from_json(REGISTRY).unwrap();
        let options = if extract {
            ParseOptions::extract_all()
        } else {
            ParseOptions::default()
        };

        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(File::read(data.as_slice(), &registry, options).unwrap());
        });
    }
}

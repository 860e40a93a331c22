use nimbus_render::shaders;

// Parse and validate a composed WGSL module, printing a readable report on failure.
fn validate_wgsl(name: &str, source: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(m) => m,
        Err(e) => panic!(
            "WGSL parsing error in {name}:\n{}",
            e.emit_to_string(source)
        ),
    };

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!(
            "WGSL validation error in {name}:\n{}",
            e.emit_to_string(source)
        );
    }
    module
}

fn entry_point_names(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|ep| ep.name.as_str()).collect()
}

#[test]
fn sky_shader_validates() {
    let module = validate_wgsl("sky", &shaders::sky_source());
    assert_eq!(entry_point_names(&module), ["vs_main", "fs_main"]);
}

#[test]
fn cloud_shader_validates() {
    let module = validate_wgsl("clouds", &shaders::clouds_source());
    assert_eq!(entry_point_names(&module), ["vs_main", "fs_main"]);
}

#[test]
fn tonemap_shader_validates() {
    let module = validate_wgsl("tonemap", shaders::tonemap_source());
    assert_eq!(entry_point_names(&module), ["vs_main", "fs_main"]);
}

#[test]
fn uniform_struct_sizes_match_rust() {
    let cases = [
        (
            shaders::clouds_source(),
            "CloudUniforms",
            std::mem::size_of::<nimbus_render::CloudUniforms>(),
        ),
        (
            shaders::clouds_source(),
            "FrameUniforms",
            std::mem::size_of::<nimbus_render::FrameUniforms>(),
        ),
        (
            shaders::sky_source(),
            "SkyUniforms",
            std::mem::size_of::<nimbus_render::SkyUniforms>(),
        ),
        (
            shaders::tonemap_source().to_string(),
            "ToneMapUniforms",
            std::mem::size_of::<nimbus_render::ToneMapUniforms>(),
        ),
    ];

    for (source, name, rust_size) in cases {
        let module = validate_wgsl(name, &source);
        let (_, ty) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some(name))
            .unwrap_or_else(|| panic!("struct {name} not found"));
        let wgsl_size = ty.inner.size(module.to_ctx());
        assert_eq!(wgsl_size as usize, rust_size, "size mismatch for {name}");
    }
}

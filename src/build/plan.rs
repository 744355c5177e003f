//! Per platform configure plans
//!
//! A [`Plan`] is everything needed to run CMake's configure step for one
//! (platform, arch, config) combination. Building a plan has no side effects apart from
//! checking that the toolchain file exists; SDK setup is done by the caller.

use std::path::PathBuf;

use crate::build::cmake::CMakeConfig;
use crate::build::emsdk;
use crate::build::toolchains::linux::LinuxCompilers;
use crate::build::{Arch, ConfigName, Layout, PlatformId};
use crate::error::{hints, BuildError};
use crate::exec::CommandLine;

/// What to plan for
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    pub platform: PlatformId,
    pub arch: &'a Arch,
    /// Generator name, aliases already resolved
    pub generator: &'a str,
    /// Set for single-config build systems only
    pub config: Option<ConfigName>,
    /// Host compilers; only consulted for linux
    pub compilers: &'a LinuxCompilers,
}

/// A resolved configure step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub platform: PlatformId,
    pub arch: Arch,
    pub config: Option<ConfigName>,
    /// Directory CMake runs in
    pub work_dir: PathBuf,
    /// CMake source directory
    pub source_dir: PathBuf,
    /// Generator, including any architecture suffix
    pub generator: String,
    pub toolchain_file: Option<PathBuf>,
    /// Platform specific `-D` variables, in order
    pub variables: Vec<(String, String)>,
    /// Extra environment for CMake
    pub env: Vec<(String, String)>,
    /// Shell snippet activating an SDK before CMake runs
    pub shell_prefix: Option<String>,
}

impl Plan {
    /// Compute the plan for a request
    pub fn build(request: &PlanRequest<'_>, layout: &Layout) -> Result<Self, BuildError> {
        let PlanRequest {
            platform,
            arch,
            generator,
            config,
            compilers,
        } = *request;

        let mut generator = generator.to_string();
        let mut variables = Vec::new();
        let mut env = Vec::new();
        let mut shell_prefix = None;
        let mut toolchain = None;

        match platform {
            PlatformId::Win32 | PlatformId::WinStore | PlatformId::WinUwp => {
                if !arch.is_std() {
                    if !generator.contains("Visual Studio") {
                        return Err(BuildError::invalid_arch_with_hint(
                            platform,
                            arch.as_str(),
                            "Architectures other than std need a Visual Studio build system.",
                        ));
                    }
                    match arch.as_str() {
                        "x64" => generator.push_str(" Win64"),
                        "arm" => generator.push_str(" ARM"),
                        _ => return Err(invalid_arch(platform, arch)),
                    }
                }

                let system_version = match platform {
                    PlatformId::WinStore => Some("8.1"),
                    PlatformId::WinUwp => Some("10.0"),
                    _ => None,
                };
                if let Some(version) = system_version {
                    variables.push(var("CMAKE_SYSTEM_NAME", "WindowsStore"));
                    variables.push(var("CMAKE_SYSTEM_VERSION", version));
                }
            }
            PlatformId::Mac => require_std(platform, arch)?,
            PlatformId::Ios => {
                let mode = match arch.as_str() {
                    Arch::STD => "OS",
                    "sim32" => "SIMULATOR",
                    "sim64" => "SIMULATOR64",
                    _ => return Err(invalid_arch(platform, arch)),
                };
                variables.push(var("IOS_PLATFORM", mode));
                toolchain = Some("iOS.cmake");
            }
            PlatformId::Web => {
                require_std(platform, arch)?;
                shell_prefix = Some(emsdk::activation_prefix(&layout.emsdk_dir()));
                toolchain = Some("Emscripten.cmake");
            }
            PlatformId::Android => {
                toolchain = Some("android.cmake");
                if !arch.is_std() {
                    variables.push(var("ANDROID_ABI", arch.as_str()));
                }
            }
            PlatformId::Dotnet => {
                variables.push(var("BODEN_PLATFORM", "dotnet"));
                require_std(platform, arch)?;
            }
            PlatformId::Linux => env = compilers.compiler_env(),
        }

        let toolchain_file = match toolchain {
            Some(name) => {
                let path = layout.toolchain_file(name);
                if !path.is_file() {
                    return Err(BuildError::MissingToolchainFile(path));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            platform,
            arch: arch.clone(),
            config,
            work_dir: layout.config_dir(platform, arch, config),
            source_dir: layout.cmake_dir.clone(),
            generator,
            toolchain_file,
            variables,
            env,
            shell_prefix,
        })
    }

    /// The CMake configure command for this plan
    pub fn configure_command(&self, cmake: &str) -> CommandLine {
        let mut cmd = CMakeConfig::new(cmake, &self.source_dir, self.generator.as_str())
            .variables(self.variables.iter().cloned())
            .toolchain_file(self.toolchain_file.clone())
            .build_type(self.config)
            .to_command();

        for (key, value) in &self.env {
            cmd = cmd.env(key, value);
        }
        if let Some(prefix) = &self.shell_prefix {
            cmd = cmd.shell_prefix(prefix);
        }
        cmd
    }
}

fn var(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

fn invalid_arch(platform: PlatformId, arch: &Arch) -> BuildError {
    BuildError::invalid_arch_with_hint(platform, arch.as_str(), hints::architectures())
}

fn require_std(platform: PlatformId, arch: &Arch) -> Result<(), BuildError> {
    if arch.is_std() {
        Ok(())
    } else {
        Err(invalid_arch(platform, arch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::toolchains::CompilerVersion;
    use crate::config::project::PathsConfig;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        layout: Layout,
    }

    /// A project with all toolchain files present
    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let layout = Layout::new(temp.path(), &PathsConfig::default());
        std::fs::create_dir_all(&layout.cmake_dir).unwrap();
        for name in ["iOS.cmake", "Emscripten.cmake", "android.cmake"] {
            std::fs::write(layout.toolchain_file(name), "").unwrap();
        }
        Fixture {
            _temp: temp,
            layout,
        }
    }

    fn plan(
        layout: &Layout,
        platform: PlatformId,
        arch: &str,
        generator: &str,
        config: Option<ConfigName>,
    ) -> Result<Plan, BuildError> {
        let arch = Arch::from(arch);
        let compilers = LinuxCompilers::default();
        let request = PlanRequest {
            platform,
            arch: &arch,
            generator,
            config,
            compilers: &compilers,
        };
        Plan::build(&request, layout)
    }

    #[test]
    fn test_windows_x64_appends_win64() {
        let f = fixture();
        for platform in [PlatformId::Win32, PlatformId::WinStore, PlatformId::WinUwp] {
            let p = plan(&f.layout, platform, "x64", "Visual Studio 15 2017", None).unwrap();
            assert_eq!(p.generator, "Visual Studio 15 2017 Win64");
            assert_eq!(p.work_dir, f.layout.build_root.join(format!("{}_x64", platform)));
        }
        let p = plan(&f.layout, PlatformId::Win32, "arm", "Visual Studio 15 2017", None).unwrap();
        assert_eq!(p.generator, "Visual Studio 15 2017 ARM");
    }

    #[test]
    fn test_windows_non_std_needs_visual_studio() {
        let f = fixture();
        let err = plan(&f.layout, PlatformId::Win32, "x64", "NMake Makefiles", None).unwrap_err();
        assert!(matches!(err, BuildError::InvalidArchitecture { .. }));
        assert_eq!(err.exit_code(), 1);

        let err = plan(&f.layout, PlatformId::Win32, "mips", "Visual Studio 16 2019", None);
        assert!(err.is_err());

        // std works with any generator
        let p = plan(&f.layout, PlatformId::Win32, "std", "NMake Makefiles", None).unwrap();
        assert_eq!(p.generator, "NMake Makefiles");
        assert!(p.variables.is_empty());
    }

    #[test]
    fn test_windows_store_system_version() {
        let f = fixture();
        let p = plan(&f.layout, PlatformId::WinStore, "std", "Visual Studio 15 2017", None).unwrap();
        assert_eq!(
            p.variables,
            vec![var("CMAKE_SYSTEM_NAME", "WindowsStore"), var("CMAKE_SYSTEM_VERSION", "8.1")]
        );
        let p = plan(&f.layout, PlatformId::WinUwp, "std", "Visual Studio 15 2017", None).unwrap();
        assert_eq!(p.variables[1], var("CMAKE_SYSTEM_VERSION", "10.0"));
    }

    #[test]
    fn test_std_only_platforms() {
        let f = fixture();
        for platform in [PlatformId::Mac, PlatformId::Web, PlatformId::Dotnet] {
            let err = plan(&f.layout, platform, "x64", "Unix Makefiles", None).unwrap_err();
            assert!(matches!(err, BuildError::InvalidArchitecture { .. }));
        }
        assert!(plan(&f.layout, PlatformId::Mac, "std", "Xcode", None).is_ok());
    }

    #[test]
    fn test_ios_modes() {
        let f = fixture();
        for (arch, mode) in [("std", "OS"), ("sim32", "SIMULATOR"), ("sim64", "SIMULATOR64")] {
            let p = plan(&f.layout, PlatformId::Ios, arch, "Xcode", None).unwrap();
            assert_eq!(p.variables, vec![var("IOS_PLATFORM", mode)]);
            assert_eq!(p.toolchain_file, Some(f.layout.toolchain_file("iOS.cmake")));
        }
        assert!(plan(&f.layout, PlatformId::Ios, "arm64", "Xcode", None).is_err());
    }

    #[test]
    fn test_android_abi() {
        let f = fixture();
        let p = plan(&f.layout, PlatformId::Android, "arm64-v8a", "Ninja", Some(ConfigName::Debug))
            .unwrap();
        let cmd = p.configure_command("cmake");
        let args = cmd.get_args();
        assert_eq!(&args[..3], &["-G", "Ninja", f.layout.cmake_dir.to_str().unwrap()]);
        assert_eq!(args[3], "-DANDROID_ABI=arm64-v8a");
        assert!(args[4].starts_with("-DCMAKE_TOOLCHAIN_FILE="));
        assert!(args[4].ends_with("android.cmake"));
        assert_eq!(args[5], "-DCMAKE_BUILD_TYPE=Debug");
        assert_eq!(args.len(), 6);
        assert_eq!(
            p.work_dir,
            f.layout.build_root.join("android_arm64-v8a").join("Debug")
        );

        let p = plan(&f.layout, PlatformId::Android, "std", "Ninja", None).unwrap();
        assert!(p.variables.is_empty());
    }

    #[test]
    fn test_dotnet_flag() {
        let f = fixture();
        let p = plan(&f.layout, PlatformId::Dotnet, "std", "Visual Studio 15 2017", None).unwrap();
        assert_eq!(p.variables, vec![var("BODEN_PLATFORM", "dotnet")]);
    }

    #[test]
    fn test_web_activates_sdk() {
        let f = fixture();
        let p = plan(&f.layout, PlatformId::Web, "std", "Unix Makefiles", Some(ConfigName::Release))
            .unwrap();
        let cmd = p.configure_command("cmake");
        assert_eq!(
            cmd.get_shell_prefix(),
            Some(emsdk::activation_prefix(&f.layout.emsdk_dir()).as_str())
        );
        assert!(p.toolchain_file.unwrap().ends_with("Emscripten.cmake"));
    }

    #[test]
    fn test_missing_toolchain_file() {
        let temp = TempDir::new().unwrap();
        let layout = Layout::new(temp.path(), &PathsConfig::default());
        let err = plan(&layout, PlatformId::Ios, "std", "Xcode", None).unwrap_err();
        match &err {
            BuildError::MissingToolchainFile(path) => {
                assert_eq!(path, &layout.cmake_dir.join("iOS.cmake"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_linux_forces_clang_over_gcc4() {
        let f = fixture();
        let arch = Arch::std();
        let compilers = LinuxCompilers {
            gcc: Some(CompilerVersion::new(vec![4, 8, 4])),
            clang: Some(CompilerVersion::new(vec![3, 8])),
        };
        let request = PlanRequest {
            platform: PlatformId::Linux,
            arch: &arch,
            generator: "Unix Makefiles",
            config: Some(ConfigName::Debug),
            compilers: &compilers,
        };
        let p = Plan::build(&request, &f.layout).unwrap();
        let rendered = p.configure_command("cmake").to_string();
        assert!(rendered.starts_with("env CC=/usr/bin/clang CXX=/usr/bin/clang++ cmake -G"));
        assert!(rendered.ends_with("-DCMAKE_BUILD_TYPE=Debug"));
    }

    #[test]
    fn test_linux_any_arch() {
        let f = fixture();
        let p = plan(&f.layout, PlatformId::Linux, "arm64", "Ninja", None).unwrap();
        assert!(p.env.is_empty());
        assert!(p.work_dir.ends_with(Path::new("linux_arm64")));
    }
}

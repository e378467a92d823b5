// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use crate::curriculum::Curriculum;
use crate::error::Fallible;

/// Parse and validate a curriculum file, or the bundled curriculum.
pub fn check_curriculum(path: Option<PathBuf>) -> Fallible<()> {
    let _ = match path {
        Some(path) => Curriculum::from_file(&path)?,
        None => Curriculum::bundled()?,
    };
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::check_curriculum;
    use crate::error::Fallible;

    #[test]
    fn test_bundled() {
        assert!(check_curriculum(None).is_ok());
    }

    #[test]
    fn test_non_existent_file() {
        assert!(check_curriculum(Some("./derpherp.toml".into())).is_err());
    }

    #[test]
    fn test_duplicate_ids() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("curriculum.toml");
        let content = "[[vocabulary]]\nid = \"a\"\nlevel = \"A1\"\nhu = \"a\"\nde = \"a\"\n\n[[vocabulary]]\nid = \"a\"\nlevel = \"A1\"\nhu = \"b\"\nde = \"b\"\n";
        write(&path, content)?;
        assert!(check_curriculum(Some(path)).is_err());
        Ok(())
    }
}

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;
use windblade_calc::{AirfoilShape, PolarSample, ProjectedProfile, Vec3};

/// 读取 CSV 并删除含空值的行
fn read_table(path: &Path) -> Result<DataFrame, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let df = CsvReader::new(file).has_header(true).finish()?;
    let rows = df.height();

    let df = df.lazy().drop_nulls(None).collect()?;
    if df.height() < rows {
        log::warn!(
            "{}: dropped {} incomplete rows",
            path.display(),
            rows - df.height()
        );
    }
    Ok(df)
}

/// 按列序号取出 f64 数据（列名以表头为准，不做匹配）
fn column_at(df: &DataFrame, idx: usize, path: &Path) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let series = df.select_at_idx(idx).ok_or_else(|| {
        format!(
            "{}: expected at least {} columns, found {}",
            path.display(),
            idx + 1,
            df.width()
        )
    })?;
    // 非数值单元格直接报错，不能变成空值
    let values = series.strict_cast(&DataType::Float64)?;
    Ok(values.f64()?.into_no_null_iter().collect())
}

/// Polar table, columns in the order Re, alpha, cl, cd, eta.
pub fn read_polar(path: &Path) -> Result<Vec<PolarSample>, Box<dyn std::error::Error>> {
    let df = read_table(path)?;
    let columns = (0..5)
        .map(|i| column_at(&df, i, path))
        .collect::<Result<Vec<_>, _>>()?;

    let samples: Vec<PolarSample> = (0..df.height())
        .map(|i| {
            PolarSample::new(
                columns[0][i],
                columns[1][i],
                columns[2][i],
                columns[3][i],
                columns[4][i],
            )
        })
        .collect();

    log::info!("polar table {}: {} samples", path.display(), samples.len());
    Ok(samples)
}

/// Airfoil shape table, columns in the order x, y.
pub fn read_shape(path: &Path) -> Result<AirfoilShape, Box<dyn std::error::Error>> {
    let df = read_table(path)?;
    let x = column_at(&df, 0, path)?;
    let y = column_at(&df, 1, path)?;
    let shape = AirfoilShape::from_xy(&x, &y)?;

    log::info!("airfoil shape {}: {} points", path.display(), shape.len());
    Ok(shape)
}

fn write_points(path: &Path, points: &[Vec3]) -> Result<(), Box<dyn std::error::Error>> {
    let mut df = df!(
        "x" => points.iter().map(|p| p.x).collect::<Vec<_>>(),
        "y" => points.iter().map(|p| p.y).collect::<Vec<_>>(),
        "z" => points.iter().map(|p| p.z).collect::<Vec<_>>()
    )?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .has_header(true)
        .with_float_precision(Some(3))
        .finish(&mut df)?;
    log::debug!("wrote {} ({} points)", path.display(), points.len());
    Ok(())
}

/// Write `coord_{r}.csv`, `coord_{r}_A.csv` and `coord_{r}_B.csv` for every
/// station, `r` being the station radius with two decimals.
pub fn write_profiles(dir: &Path, profiles: &[ProjectedProfile]) -> Result<usize, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let mut written = 0;
    for profile in profiles {
        let stem = format!("coord_{:.2}", profile.radius);
        write_points(&dir.join(format!("{}.csv", stem)), &profile.full)?;
        write_points(&dir.join(format!("{}_A.csv", stem)), &profile.half_a)?;
        write_points(&dir.join(format!("{}_B.csv", stem)), &profile.half_b)?;
        written += 3;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("windblade_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_write_profiles_fixed_precision() {
        let dir = scratch_dir("profiles");
        let point = Vec3::new(2.0, 0.1, 12.5);
        let profile = ProjectedProfile {
            radius: 0.125,
            full: vec![point, Vec3::new(-0.0126, 1.23449, 7.0)],
            half_a: vec![point],
            half_b: vec![point],
        };

        let written = write_profiles(&dir, &[profile]).unwrap();
        assert_eq!(written, 3);

        let stem = format!("coord_{:.2}", 0.125);
        let full = fs::read_to_string(dir.join(format!("{}.csv", stem))).unwrap();
        assert_eq!(full, "x,y,z\n2.000,0.100,12.500\n-0.013,1.234,7.000\n");
        let half_a = fs::read_to_string(dir.join(format!("{}_A.csv", stem))).unwrap();
        assert_eq!(half_a, "x,y,z\n2.000,0.100,12.500\n");
        assert!(dir.join(format!("{}_B.csv", stem)).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_shape_rejects_text_cells() {
        let dir = scratch_dir("shape");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("shape.csv");
        fs::write(&path, "x,y\n1.0,0.0\nabc,0.1\n0.0,0.0\n").unwrap();

        assert!(read_shape(&path).is_err());

        fs::write(&path, "x,y\n1.0,0.0\n0.5,0.1\n0.0,0.0\n").unwrap();
        assert_eq!(read_shape(&path).unwrap().len(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }
}

use {
    crate::*,
    bitvec::prelude::*,
    glam::IVec2,
    nom::{
        bytes::complete::tag,
        character::complete::{digit1, line_ending},
        combinator::{map, map_res, opt},
        error::Error,
        multi::many1,
        sequence::{delimited, terminated, tuple},
        Err, IResult,
    },
    num::integer::Roots,
    rayon::prelude::*,
    static_assertions::const_assert,
    std::{
        collections::{BTreeMap, BTreeSet},
        str::FromStr,
    },
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

type TileId = u32;
type BorderSignature = u64;

/// One of the eight bitmaps a tile can present: the mirror (a left-right flip) is applied first,
/// then the clockwise quarter turns.
#[derive(Clone, Copy, Debug, Default, EnumCount, EnumIter, Eq, PartialEq)]
#[repr(u8)]
enum Orientation {
    #[default]
    Identity,
    QuarterTurn,
    HalfTurn,
    ThreeQuarterTurn,
    MirroredIdentity,
    MirroredQuarterTurn,
    MirroredHalfTurn,
    MirroredThreeQuarterTurn,
}

// This guarantees the low two bits are the quarter-turn count and the next bit is the mirror flag
const_assert!(Orientation::COUNT == 8_usize);

impl Orientation {
    const QUARTER_TURNS_MASK: u8 = 3_u8;
    const MIRRORED_FLAG: u8 = 4_u8;

    #[inline]
    const fn quarter_turns(self) -> u8 {
        self as u8 & Self::QUARTER_TURNS_MASK
    }

    #[inline]
    const fn is_mirrored(self) -> bool {
        self as u8 & Self::MIRRORED_FLAG != 0_u8
    }
}

fn rotated_cw<T: Copy + Default>(grid: &Grid2D<T>) -> Grid2D<T> {
    let dimensions: IVec2 = grid.dimensions();
    let mut rotated: Grid2D<T> = Grid2D::default(IVec2::new(dimensions.y, dimensions.x));

    for pos in grid.iter_positions() {
        *rotated
            .get_mut(IVec2::new(dimensions.y - 1_i32 - pos.y, pos.x))
            .unwrap() = *grid.get(pos).unwrap();
    }

    rotated
}

fn mirrored<T: Copy + Default>(grid: &Grid2D<T>) -> Grid2D<T> {
    let dimensions: IVec2 = grid.dimensions();
    let mut mirrored: Grid2D<T> = Grid2D::default(dimensions);

    for pos in grid.iter_positions() {
        *mirrored
            .get_mut(IVec2::new(dimensions.x - 1_i32 - pos.x, pos.y))
            .unwrap() = *grid.get(pos).unwrap();
    }

    mirrored
}

fn oriented<T: Copy + Default>(grid: &Grid2D<T>, orientation: Orientation) -> Grid2D<T> {
    let mut oriented: Grid2D<T> = if orientation.is_mirrored() {
        mirrored(grid)
    } else {
        grid.clone()
    };

    for _ in 0_u8..orientation.quarter_turns() {
        oriented = rotated_cw(&oriented);
    }

    oriented
}

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone)]
struct Tile {
    id: TileId,
    grid: Grid2D<Pixel>,
}

impl Tile {
    /// Reads one edge of the bitmap as a binary number: the north and south rows west to east, the
    /// west and east columns north to south, most significant bit first.
    fn border(&self, dir: Direction) -> BorderSignature {
        let max_dimensions: IVec2 = self.grid.max_dimensions();
        let (start, along): (IVec2, Direction) = match dir {
            Direction::North => (IVec2::ZERO, Direction::East),
            Direction::East => (IVec2::new(max_dimensions.x, 0_i32), Direction::South),
            Direction::South => (IVec2::new(0_i32, max_dimensions.y), Direction::East),
            Direction::West => (IVec2::ZERO, Direction::South),
        };

        CellIter2D::until_boundary(&self.grid, start, along).fold(
            0_u64,
            |signature: BorderSignature, pos: IVec2| {
                (signature << 1_u32) | self.grid.get(pos).unwrap().is_light() as BorderSignature
            },
        )
    }

    fn borders(&self) -> [BorderSignature; Direction::COUNT] {
        [
            self.border(Direction::North),
            self.border(Direction::East),
            self.border(Direction::South),
            self.border(Direction::West),
        ]
    }

    /// A new tile with the same id presenting the requested orientation. Tiles are never reoriented
    /// in place: variants of the same tile get compared against each other constantly, so they
    /// can't share a bitmap.
    fn orient(&self, orientation: Orientation) -> Self {
        Self {
            id: self.id,
            grid: oriented(&self.grid, orientation),
        }
    }
}

impl Parse for Tile {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                delimited(tag("Tile "), map_res(digit1, TileId::from_str), tag(":")),
                line_ending,
                Grid2D::parse,
            )),
            |(id, _, grid)| Self { id, grid },
        )(input)
    }
}

/// All eight orientations of one parsed tile, in `Orientation` order, plus every border signature
/// those orientations present (the currency of the adjacency scan).
struct TileVariants {
    variants: Vec<Tile>,
    border_signatures: Vec<BorderSignature>,
}

impl TileVariants {
    fn new(tile: &Tile) -> Self {
        let variants: Vec<Tile> = Orientation::iter()
            .map(|orientation: Orientation| tile.orient(orientation))
            .collect();
        let border_signatures: Vec<BorderSignature> =
            variants.iter().flat_map(Tile::borders).collect();

        Self {
            variants,
            border_signatures,
        }
    }

    fn id(&self) -> TileId {
        self.variants[0_usize].id
    }

    /// Whether some orientation of either tile lines one of its borders up with one of the other's.
    /// First match wins; how many borders match is irrelevant.
    fn shares_border_with(&self, other: &Self) -> bool {
        self.border_signatures
            .iter()
            .any(|signature: &BorderSignature| other.border_signatures.contains(signature))
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
struct Adjacencies(BTreeMap<TileId, BTreeSet<TileId>>);

impl Adjacencies {
    fn neighbor_ids(&self, tile_id: TileId) -> &BTreeSet<TileId> {
        &self.0[&tile_id]
    }

    /// Corner tiles are exactly the tiles with two matchable neighbors. This is a derived query:
    /// nothing about a corner is stored.
    fn corner_tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.0
            .iter()
            .filter(|(_, neighbor_ids)| neighbor_ids.len() == 2_usize)
            .map(|(tile_id, _)| *tile_id)
    }
}

#[derive(Debug, PartialEq)]
pub enum MalformedInputError<'i> {
    UnparseableInput(Err<Error<&'i str>>),
    NonSquareTile { id: TileId, dimensions: IVec2 },
    TileSideLenExceedsSignatureBits { id: TileId, side_len: usize },
    DuplicateTileId(TileId),
}

#[derive(Debug, PartialEq)]
pub enum InsufficientDataError {
    CornerTileCountIsNotFour(usize),
}

#[derive(Debug, PartialEq)]
pub enum AssemblyError {
    TileCountIsNotSquare(usize),
    InsufficientData(InsufficientDataError),
    NoAnchorOrientation(TileId),
    UnfillableCell(IVec2),
    NoSeaMonsters,
}

impl From<InsufficientDataError> for AssemblyError {
    fn from(value: InsufficientDataError) -> Self {
        Self::InsufficientData(value)
    }
}

define_cell! {
    #[repr(u8)]
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    enum WaterCell {
        #[default]
        Calm = CALM = b'.',
        Rough = ROUGH = b'#',
        SeaMonster = SEA_MONSTER = b'O',
    }
}

impl WaterCell {
    fn is_rough(self) -> bool {
        matches!(self, Self::Rough)
    }
}

impl From<Pixel> for WaterCell {
    fn from(value: Pixel) -> Self {
        if value.is_light() {
            Self::Rough
        } else {
            Self::Calm
        }
    }
}

/// The search pattern, relative to the westmost pixel of its middle row:
///
/// ```text
///                   #
/// #    ##    ##    ###
///  #  #  #  #  #  #
/// ```
const SEA_MONSTER_DELTAS: [IVec2; 15_usize] = [
    IVec2::new(18_i32, -1_i32),
    IVec2::new(0_i32, 0_i32),
    IVec2::new(5_i32, 0_i32),
    IVec2::new(6_i32, 0_i32),
    IVec2::new(11_i32, 0_i32),
    IVec2::new(12_i32, 0_i32),
    IVec2::new(17_i32, 0_i32),
    IVec2::new(18_i32, 0_i32),
    IVec2::new(19_i32, 0_i32),
    IVec2::new(1_i32, 1_i32),
    IVec2::new(4_i32, 1_i32),
    IVec2::new(7_i32, 1_i32),
    IVec2::new(10_i32, 1_i32),
    IVec2::new(13_i32, 1_i32),
    IVec2::new(16_i32, 1_i32),
];

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    tiles: Vec<Tile>,
}

impl Solution {
    fn tile_variants(&self) -> Vec<TileVariants> {
        self.tiles.iter().map(TileVariants::new).collect()
    }

    /// The symmetric neighbor relation over tile ids. Each unordered tile pair is independent of
    /// every other, so the scan runs over the rayon thread pool; the neighbor sets are only filled
    /// in once all pairs have been collected, keeping the insertion single-threaded.
    fn try_adjacencies(
        tile_variants: &[TileVariants],
    ) -> Result<Adjacencies, InsufficientDataError> {
        let adjacent_id_pairs: Vec<(TileId, TileId)> = (0_usize..tile_variants.len())
            .into_par_iter()
            .flat_map_iter(|index_a: usize| {
                let tile_variants_a: &TileVariants = &tile_variants[index_a];

                (index_a + 1_usize..tile_variants.len())
                    .filter(move |index_b: &usize| {
                        tile_variants_a.shares_border_with(&tile_variants[*index_b])
                    })
                    .map(move |index_b: usize| {
                        (tile_variants_a.id(), tile_variants[index_b].id())
                    })
            })
            .collect();

        let mut neighbor_ids: BTreeMap<TileId, BTreeSet<TileId>> = tile_variants
            .iter()
            .map(|tile_variants_entry: &TileVariants| (tile_variants_entry.id(), BTreeSet::new()))
            .collect();

        for (tile_id_a, tile_id_b) in adjacent_id_pairs {
            neighbor_ids.get_mut(&tile_id_a).unwrap().insert(tile_id_b);
            neighbor_ids.get_mut(&tile_id_b).unwrap().insert(tile_id_a);
        }

        let adjacencies: Adjacencies = Adjacencies(neighbor_ids);
        let corner_tile_count: usize = adjacencies.corner_tile_ids().count();

        if corner_tile_count == 4_usize {
            Ok(adjacencies)
        } else {
            Err(InsufficientDataError::CornerTileCountIsNotFour(
                corner_tile_count,
            ))
        }
    }

    fn try_corner_tile_ids(&self) -> Result<Vec<TileId>, InsufficientDataError> {
        Ok(Self::try_adjacencies(&self.tile_variants())?
            .corner_tile_ids()
            .collect())
    }

    fn try_corner_id_product(&self) -> Result<u64, InsufficientDataError> {
        Ok(Self::try_adjacencies(&self.tile_variants())?
            .corner_tile_ids()
            .map(u64::from)
            .product())
    }

    /// Fixes the orientation of the north-west corner tile: the anchor must simultaneously feed
    /// its east border to some orientation of one neighbor's west border and its south border to
    /// some orientation of the other neighbor's north border. Both neighbor assignments get tried.
    fn try_anchor(
        adjacencies: &Adjacencies,
        tile_variants_by_id: &BTreeMap<TileId, &TileVariants>,
    ) -> Result<Tile, AssemblyError> {
        let corner_tile_id: TileId = adjacencies.corner_tile_ids().next().unwrap();
        let mut neighbor_id_iter = adjacencies.neighbor_ids(corner_tile_id).iter();
        let neighbor_id_a: TileId = *neighbor_id_iter.next().unwrap();
        let neighbor_id_b: TileId = *neighbor_id_iter.next().unwrap();

        let fits_east_and_south = |anchor: &Tile, east_id: TileId, south_id: TileId| -> bool {
            let east_border: BorderSignature = anchor.border(Direction::East);
            let south_border: BorderSignature = anchor.border(Direction::South);

            tile_variants_by_id[&east_id]
                .variants
                .iter()
                .any(|variant: &Tile| variant.border(Direction::West) == east_border)
                && tile_variants_by_id[&south_id]
                    .variants
                    .iter()
                    .any(|variant: &Tile| variant.border(Direction::North) == south_border)
        };

        tile_variants_by_id[&corner_tile_id]
            .variants
            .iter()
            .find(|anchor: &&Tile| {
                fits_east_and_south(anchor, neighbor_id_a, neighbor_id_b)
                    || fits_east_and_south(anchor, neighbor_id_b, neighbor_id_a)
            })
            .cloned()
            .ok_or(AssemblyError::NoAnchorOrientation(corner_tile_id))
    }

    /// Row-major assembly. Each new cell must extend its already-placed west and north neighbors
    /// with bit-identical facing borders; interior cells draw their candidates from both placed
    /// neighbors' adjacency sets, so an inconsistent relation fails closed instead of producing a
    /// torn image.
    fn try_assemble(&self) -> Result<Grid2D<Tile>, AssemblyError> {
        let tile_count: usize = self.tiles.len();
        let side_len: usize = tile_count.sqrt();

        if side_len * side_len != tile_count {
            return Err(AssemblyError::TileCountIsNotSquare(tile_count));
        }

        let tile_variants: Vec<TileVariants> = self.tile_variants();
        let adjacencies: Adjacencies = Self::try_adjacencies(&tile_variants)?;
        let tile_variants_by_id: BTreeMap<TileId, &TileVariants> = tile_variants
            .iter()
            .map(|tile_variants_entry: &TileVariants| {
                (tile_variants_entry.id(), tile_variants_entry)
            })
            .collect();
        let tile_index_by_id: BTreeMap<TileId, usize> = self
            .tiles
            .iter()
            .enumerate()
            .map(|(tile_index, tile): (usize, &Tile)| (tile.id, tile_index))
            .collect();

        let anchor: Tile = Self::try_anchor(&adjacencies, &tile_variants_by_id)?;
        let mut placed: BitVec = bitvec![0; tile_count];
        let mut assembled: Grid2D<Option<Tile>> = Grid2D::default(SideLen(side_len).into());

        placed.set(tile_index_by_id[&anchor.id], true);
        *assembled.get_mut(IVec2::ZERO).unwrap() = Some(anchor);

        for pos in assembled.iter_positions().skip(1_usize) {
            let west_constraint: Option<(TileId, BorderSignature)> = (pos.x > 0_i32).then(|| {
                let west_tile: &Tile = assembled
                    .get(pos + Direction::West.vec())
                    .unwrap()
                    .as_ref()
                    .unwrap();

                (west_tile.id, west_tile.border(Direction::East))
            });
            let north_constraint: Option<(TileId, BorderSignature)> = (pos.y > 0_i32).then(|| {
                let north_tile: &Tile = assembled
                    .get(pos + Direction::North.vec())
                    .unwrap()
                    .as_ref()
                    .unwrap();

                (north_tile.id, north_tile.border(Direction::South))
            });
            let candidate_ids: Vec<TileId> = match (west_constraint, north_constraint) {
                (Some((west_id, _)), Some((north_id, _))) => adjacencies
                    .neighbor_ids(west_id)
                    .intersection(adjacencies.neighbor_ids(north_id))
                    .copied()
                    .collect(),
                (Some((west_id, _)), None) => {
                    adjacencies.neighbor_ids(west_id).iter().copied().collect()
                }
                (None, Some((north_id, _))) => {
                    adjacencies.neighbor_ids(north_id).iter().copied().collect()
                }
                (None, None) => unreachable!(),
            };

            let tile: Tile = candidate_ids
                .into_iter()
                .filter(|candidate_id: &TileId| !placed[tile_index_by_id[candidate_id]])
                .find_map(|candidate_id: TileId| {
                    tile_variants_by_id[&candidate_id]
                        .variants
                        .iter()
                        .find(|variant: &&Tile| {
                            west_constraint.map_or(true, |(_, east_border)| {
                                variant.border(Direction::West) == east_border
                            }) && north_constraint.map_or(true, |(_, south_border)| {
                                variant.border(Direction::North) == south_border
                            })
                        })
                        .cloned()
                })
                .ok_or(AssemblyError::UnfillableCell(pos))?;

            placed.set(tile_index_by_id[&tile.id], true);
            *assembled.get_mut(pos).unwrap() = Some(tile);
        }

        let cells: Vec<Tile> = assembled
            .cells()
            .iter()
            .map(|tile: &Option<Tile>| tile.clone().unwrap())
            .collect();

        Ok(Grid2D::try_from_cells_and_dimensions(cells, SideLen(side_len).into()).unwrap())
    }

    /// Strips the one-pixel border from every assembled tile and concatenates the interiors in
    /// grid order.
    fn composite_image(assembled: &Grid2D<Tile>) -> Grid2D<Pixel> {
        let tile_side_len: i32 = assembled.get(IVec2::ZERO).unwrap().grid.dimensions().x;
        let interior_side_len: i32 = tile_side_len - 2_i32;
        let mut composite: Grid2D<Pixel> =
            Grid2D::default(assembled.dimensions() * interior_side_len);

        for tile_pos in assembled.iter_positions() {
            let tile: &Tile = assembled.get(tile_pos).unwrap();
            let composite_corner: IVec2 = tile_pos * interior_side_len;

            for y in 0_i32..interior_side_len {
                for x in 0_i32..interior_side_len {
                    let interior_pos: IVec2 = IVec2::new(x, y);

                    *composite.get_mut(composite_corner + interior_pos).unwrap() =
                        *tile.grid.get(interior_pos + IVec2::ONE).unwrap();
                }
            }
        }

        composite
    }

    /// Marks every sea monster in one fixed orientation of an image. Matches are detected against
    /// the unmarked image, so overlapping sea monsters are each found, and their pixels are marked
    /// at most once.
    fn mark_sea_monsters(image: &Grid2D<Pixel>) -> (Grid2D<WaterCell>, usize) {
        let mut water: Grid2D<WaterCell> = Grid2D::try_from_cells_and_dimensions(
            image.cells().iter().copied().map(WaterCell::from).collect(),
            image.dimensions(),
        )
        .unwrap();
        let mut sea_monster_count: usize = 0_usize;

        for pos in image.iter_positions() {
            if SEA_MONSTER_DELTAS.iter().all(|delta: &IVec2| {
                image
                    .get(pos + *delta)
                    .map_or(false, |pixel: &Pixel| pixel.is_light())
            }) {
                sea_monster_count += 1_usize;

                for delta in SEA_MONSTER_DELTAS {
                    *water.get_mut(pos + delta).unwrap() = WaterCell::SeaMonster;
                }
            }
        }

        (water, sea_monster_count)
    }

    /// The first of the eight composite image orientations containing at least one sea monster,
    /// with its sea monsters marked.
    fn try_sea_monster_image(&self) -> Result<Grid2D<WaterCell>, AssemblyError> {
        let assembled: Grid2D<Tile> = self.try_assemble()?;
        let composite: Grid2D<Pixel> = Self::composite_image(&assembled);

        Orientation::iter()
            .find_map(|orientation: Orientation| {
                let (water, sea_monster_count): (Grid2D<WaterCell>, usize) =
                    Self::mark_sea_monsters(&oriented(&composite, orientation));

                (sea_monster_count > 0_usize).then_some(water)
            })
            .ok_or(AssemblyError::NoSeaMonsters)
    }

    fn water_roughness(water: &Grid2D<WaterCell>) -> usize {
        water
            .cells()
            .iter()
            .filter(|water_cell: &&WaterCell| water_cell.is_rough())
            .count()
    }

    fn try_water_roughness(&self) -> Result<usize, AssemblyError> {
        self.try_sea_monster_image()
            .map(|water: Grid2D<WaterCell>| Self::water_roughness(&water))
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(many1(terminated(Tile::parse, opt(line_ending))), |tiles| {
            Self { tiles }
        })(input)
    }
}

impl RunQuestions for Solution {
    /// The corner tiles identify themselves by having only two matchable neighbors, so no cell of
    /// the image needs to be placed yet.
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            dbg!(self.try_corner_tile_ids());
        }

        dbg!(self.try_corner_id_product());
    }

    /// Assembling the image is the bulk of the work; sea monsters only ever show up in one of the
    /// eight orientations of the finished image.
    fn q2_internal(&mut self, args: &QuestionArgs) {
        if !args.verbose {
            dbg!(self.try_water_roughness());
        } else {
            match self.try_sea_monster_image() {
                Ok(water) => {
                    println!("{}", String::from(water.clone()));
                    dbg!(Self::water_roughness(&water));
                }
                Err(assembly_error) => {
                    eprintln!("Failed to search for sea monsters:\n{assembly_error:#?}");
                }
            }
        }
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = MalformedInputError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        use MalformedInputError as Error;

        let solution: Self = Self::parse(input).map_err(Error::UnparseableInput)?.1;
        let mut tile_ids: BTreeSet<TileId> = BTreeSet::new();

        for tile in &solution.tiles {
            let dimensions: IVec2 = tile.grid.dimensions();

            if dimensions.x != dimensions.y {
                return Err(Error::NonSquareTile {
                    id: tile.id,
                    dimensions,
                });
            }

            if dimensions.x as u32 > BorderSignature::BITS {
                return Err(Error::TileSideLenExceedsSignatureBits {
                    id: tile.id,
                    side_len: dimensions.x as usize,
                });
            }

            if !tile_ids.insert(tile.id) {
                return Err(Error::DuplicateTileId(tile.id));
            }
        }

        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &str = "\
        Tile 2311:\n\
        ..##.#..#.\n\
        ##..#.....\n\
        #...##..#.\n\
        ####.#...#\n\
        ##.##.###.\n\
        ##...#.###\n\
        .#.#.#..##\n\
        ..#....#..\n\
        ###...#.#.\n\
        ..###..###\n\
        \n\
        Tile 1951:\n\
        #.##...##.\n\
        #.####...#\n\
        .....#..##\n\
        #...######\n\
        .##.#....#\n\
        .###.#####\n\
        ###.##.##.\n\
        .###....#.\n\
        ..#.#..#.#\n\
        #...##.#..\n\
        \n\
        Tile 1171:\n\
        ####...##.\n\
        #..##.#..#\n\
        ##.#..#.#.\n\
        .###.####.\n\
        ..###.####\n\
        .##....##.\n\
        .#...####.\n\
        #.##.####.\n\
        ####..#...\n\
        .....##...\n\
        \n\
        Tile 1427:\n\
        ###.##.#..\n\
        .#..#.##..\n\
        .#.##.#..#\n\
        #.#.#.##.#\n\
        ....#...##\n\
        ...##..##.\n\
        ...#.#####\n\
        .#.####.#.\n\
        ..#..###.#\n\
        ..##.#..#.\n\
        \n\
        Tile 1489:\n\
        ##.#.#....\n\
        ..##...#..\n\
        .##..##...\n\
        ..#...#...\n\
        #####...#.\n\
        #..#.#.#.#\n\
        ...#.#.#..\n\
        ##.#...##.\n\
        ..##.##.##\n\
        ###.##.#..\n\
        \n\
        Tile 2473:\n\
        #....####.\n\
        #..#.##...\n\
        #.##..#...\n\
        ######.#.#\n\
        .#...#.#.#\n\
        .#########\n\
        .###.#..#.\n\
        ########.#\n\
        ##...##.#.\n\
        ..###.#.#.\n\
        \n\
        Tile 2971:\n\
        ..#.#....#\n\
        #...###...\n\
        #.#.###...\n\
        ##.##..#..\n\
        .#####..##\n\
        .#..####.#\n\
        #..#.#..#.\n\
        ..####.###\n\
        ..#.#.###.\n\
        ...#.#.#.#\n\
        \n\
        Tile 2729:\n\
        ...#.#.#.#\n\
        ####.#....\n\
        ..#.#.....\n\
        ....#..#.#\n\
        .##..##.#.\n\
        .#.####...\n\
        ####.#.#..\n\
        ##.####...\n\
        ##..#.##..\n\
        #.##...##.\n\
        \n\
        Tile 3079:\n\
        #.#.#####.\n\
        .#..######\n\
        ..#.......\n\
        ######....\n\
        ####.#..#.\n\
        .#...#.##.\n\
        #.#####.##\n\
        ..#.###...\n\
        ..#.......\n\
        ..#.###...\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Solution::try_from(SOLUTION_STR).unwrap())
    }

    fn small_tile() -> Tile {
        use Pixel::{Dark as D, Light as L};

        Tile {
            id: 7_u32,
            grid: Grid2D::try_from_cells_and_dimensions(
                vec![L, D, L, D, D, D, L, L, D],
                SideLen(3_usize).into(),
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(
            solution
                .tiles
                .iter()
                .map(|tile: &Tile| tile.id)
                .collect::<Vec<TileId>>(),
            vec![2311, 1951, 1171, 1427, 1489, 2473, 2971, 2729, 3079]
        );
        assert!(solution
            .tiles
            .iter()
            .all(|tile: &Tile| tile.grid.dimensions() == SideLen(10_usize).into()));
        pretty_assert_eq!(
            String::from(solution.tiles[0_usize].grid.clone()),
            "..##.#..#.\n##..#.....\n#...##..#.\n####.#...#\n##.##.###.\n##...#.###\n\
            .#.#.#..##\n..#....#..\n###...#.#.\n..###..###\n"
                .to_owned()
        );
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            Solution::try_from("Tile 11:\n##.\n#.\n"),
            Err(MalformedInputError::UnparseableInput(_))
        ));
        assert!(matches!(
            Solution::try_from("Tile eleven:\n##\n##\n"),
            Err(MalformedInputError::UnparseableInput(_))
        ));
        assert_eq!(
            Solution::try_from("Tile 11:\n##.\n..#\n"),
            Err(MalformedInputError::NonSquareTile {
                id: 11_u32,
                dimensions: IVec2::new(3_i32, 2_i32)
            })
        );
        assert_eq!(
            Solution::try_from("Tile 11:\n##\n##\n\nTile 11:\n..\n..\n"),
            Err(MalformedInputError::DuplicateTileId(11_u32))
        );
    }

    #[test]
    fn test_border() {
        let tile: Tile = small_tile();

        assert_eq!(tile.border(Direction::North), 0b101_u64);
        assert_eq!(tile.border(Direction::East), 0b100_u64);
        assert_eq!(tile.border(Direction::South), 0b110_u64);
        assert_eq!(tile.border(Direction::West), 0b101_u64);
    }

    #[test]
    fn test_orient() {
        let tile: Tile = solution().tiles[0_usize].clone();

        for orientation in Orientation::iter() {
            assert_eq!(tile.orient(orientation).id, tile.id);
        }

        let mut rotated: Tile = tile.clone();

        for _ in 0_usize..4_usize {
            rotated = rotated.orient(Orientation::QuarterTurn);
        }

        assert_eq!(rotated, tile);
        assert_eq!(
            tile.orient(Orientation::MirroredIdentity)
                .orient(Orientation::MirroredIdentity),
            tile
        );
        assert_eq!(
            tile.orient(Orientation::QuarterTurn)
                .border(Direction::East),
            tile.border(Direction::North)
        );
        assert_eq!(
            Orientation::iter()
                .map(|orientation: Orientation| String::from(tile.orient(orientation).grid))
                .collect::<BTreeSet<String>>()
                .len(),
            Orientation::COUNT
        );
    }

    #[test]
    fn test_try_adjacencies() {
        let adjacencies: Adjacencies =
            Solution::try_adjacencies(&solution().tile_variants()).unwrap();

        for (tile_id, neighbor_ids) in &adjacencies.0 {
            for neighbor_id in neighbor_ids {
                assert!(adjacencies.neighbor_ids(*neighbor_id).contains(tile_id));
            }
        }

        assert_eq!(
            adjacencies.corner_tile_ids().collect::<Vec<TileId>>(),
            vec![1171, 1951, 2971, 3079]
        );

        for (corner_tile_id, expected_neighbor_ids) in [
            (1171_u32, [1489_u32, 2473_u32]),
            (1951_u32, [2311_u32, 2729_u32]),
            (2971_u32, [1489_u32, 2729_u32]),
            (3079_u32, [2311_u32, 2473_u32]),
        ] {
            assert_eq!(
                adjacencies
                    .neighbor_ids(corner_tile_id)
                    .iter()
                    .copied()
                    .collect::<Vec<TileId>>(),
                expected_neighbor_ids.to_vec()
            );
        }

        assert_eq!(
            adjacencies
                .neighbor_ids(1427_u32)
                .iter()
                .copied()
                .collect::<Vec<TileId>>(),
            vec![1489_u32, 2311_u32, 2473_u32, 2729_u32]
        );
    }

    #[test]
    fn test_try_corner_id_product() {
        assert_eq!(
            solution().try_corner_id_product(),
            Ok(20899048083289_u64)
        );
    }

    #[test]
    fn test_try_assemble() {
        let assembled: Grid2D<Tile> = solution().try_assemble().unwrap();

        assert_eq!(assembled.dimensions(), SideLen(3_usize).into());

        let mut placed_tile_ids: Vec<TileId> = assembled
            .cells()
            .iter()
            .map(|tile: &Tile| tile.id)
            .collect();

        placed_tile_ids.sort();

        assert_eq!(
            placed_tile_ids,
            vec![1171, 1427, 1489, 1951, 2311, 2473, 2729, 2971, 3079]
        );

        for pos in assembled.iter_positions() {
            for dir in [Direction::East, Direction::South] {
                if let Some(neighbor_tile) = assembled.get(pos + dir.vec()) {
                    assert_eq!(
                        assembled.get(pos).unwrap().border(dir),
                        neighbor_tile.border(dir.rev()),
                        "mismatched facing borders between {pos} and {}",
                        pos + dir.vec()
                    );
                }
            }
        }
    }

    #[test]
    fn test_composite_image() {
        let composite: Grid2D<Pixel> =
            Solution::composite_image(&solution().try_assemble().unwrap());

        assert_eq!(composite.dimensions(), SideLen(24_usize).into());
        assert_eq!(
            composite
                .cells()
                .iter()
                .filter(|pixel: &&Pixel| pixel.is_light())
                .count(),
            303_usize
        );
    }

    #[test]
    fn test_mark_sea_monsters() {
        let image: Grid2D<Pixel> = Grid2D::parse("#.#\n...\n##.\n").unwrap().1;
        let (water, sea_monster_count): (Grid2D<WaterCell>, usize) =
            Solution::mark_sea_monsters(&image);

        assert_eq!(sea_monster_count, 0_usize);
        assert_eq!(Solution::water_roughness(&water), 4_usize);
        pretty_assert_eq!(String::from(water), "#.#\n...\n##.\n".to_owned());
    }

    #[test]
    fn test_try_sea_monster_image() {
        let water: Grid2D<WaterCell> = solution().try_sea_monster_image().unwrap();

        assert_eq!(
            water
                .cells()
                .iter()
                .filter(|water_cell: &&WaterCell| **water_cell == WaterCell::SeaMonster)
                .count(),
            30_usize
        );
        assert_eq!(Solution::water_roughness(&water), 273_usize);
    }

    #[test]
    fn test_try_water_roughness() {
        assert_eq!(solution().try_water_roughness(), Ok(273_usize));
    }
}

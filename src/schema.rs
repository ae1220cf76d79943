// Diesel schema for the molecule dictionary. The compound structure tables
// (compound_mols, fps_rdkit) are only ever reached through raw dialect
// fragments, so they carry no schema here.
diesel::table! {
    molecule_dictionary (molregno) {
        molregno -> BigInt,
        structure_type -> Text,
        structure_key -> Text,
        project_id -> BigInt,
        public -> Bool,
    }
}

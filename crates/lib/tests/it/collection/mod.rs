mod dict_deltas;
